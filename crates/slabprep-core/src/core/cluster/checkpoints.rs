use std::cmp::Ordering;

/// Default stem of the restart files a production run writes (`restart.<step>`).
pub const DEFAULT_CHECKPOINT_STEM: &str = "restart";

/// A restart file and the simulation step it was written at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub file_name: String,
    pub step: u64,
}

impl Checkpoint {
    /// Parses `<stem><sep><step>` where `<sep>` is one of `.`, `_` or `-`.
    pub fn parse(file_name: &str, stem: &str) -> Option<Self> {
        let rest = file_name.strip_prefix(stem)?;
        let mut chars = rest.chars();
        if !matches!(chars.next(), Some('.' | '_' | '-')) {
            return None;
        }
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            file_name: file_name.to_string(),
            step: digits.parse().ok()?,
        })
    }
}

/// Returns the checkpoint with the highest step among `file_names`.
///
/// Names that are not checkpoints of `stem` are ignored. On equal steps the
/// lexicographically smaller name wins so the result does not depend on listing order.
pub fn latest_checkpoint<'a>(
    file_names: impl IntoIterator<Item = &'a str>,
    stem: &str,
) -> Option<Checkpoint> {
    file_names
        .into_iter()
        .filter_map(|name| Checkpoint::parse(name.trim(), stem))
        .max_by(|a, b| match a.step.cmp(&b.step) {
            Ordering::Equal => b.file_name.cmp(&a.file_name),
            other => other,
        })
}
