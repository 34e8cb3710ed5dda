use super::TemplateError;

/// Values interpolated into the batch submission template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFields {
    pub node: String,
    pub ppn: String,
    pub queue: String,
    pub simulation_name: String,
    pub lammps_exe: String,
    /// Control script handed to LAMMPS with `-in`.
    pub control_script: String,
}

impl SubmitFields {
    /// The same job pointed at another control script.
    pub fn for_control_script(&self, control_script: &str) -> Self {
        Self {
            control_script: control_script.to_string(),
            ..self.clone()
        }
    }

    fn lookup(&self, field: &str) -> Option<&str> {
        match field {
            "node" => Some(&self.node),
            "ppn" => Some(&self.ppn),
            "queue" => Some(&self.queue),
            "simulation_name" => Some(&self.simulation_name),
            "lammps_exe" => Some(&self.lammps_exe),
            "control_script" => Some(&self.control_script),
            _ => None,
        }
    }
}

/// Substitutes `{field}` placeholders; `{{` and `}}` produce literal braces.
///
/// # Errors
///
/// Returns [`TemplateError::UnknownField`] for a placeholder that names no field and
/// [`TemplateError::UnbalancedBrace`] for a brace that is neither escaped nor closed.
pub fn render(template: &str, fields: &SubmitFields) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + 64);
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    if inner == '{' {
                        return Err(TemplateError::UnbalancedBrace { position: pos });
                    }
                    name.push(inner);
                }
                if !closed {
                    return Err(TemplateError::UnbalancedBrace { position: pos });
                }
                let field = name.trim();
                let value = fields
                    .lookup(field)
                    .ok_or_else(|| TemplateError::UnknownField {
                        field: field.to_string(),
                    })?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::UnbalancedBrace { position: pos });
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}
