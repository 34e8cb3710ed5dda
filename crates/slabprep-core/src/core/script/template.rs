use super::{carriage_return, join_lines, split_lines};
use crate::core::models::params::{DecimalsMap, ParameterMap, ParameterValue};
use crate::core::utils::format::fixed_float;

const DECLARATION_KEYWORD: &str = "variable";

/// Renders a value for a declaration, honouring a fixed decimal count for numbers.
pub fn format_value(value: &ParameterValue, decimals: Option<usize>) -> String {
    match (value.as_f64(), decimals) {
        (Some(v), Some(places)) => fixed_float(v, places),
        _ => value.to_string(),
    }
}

/// Rewrites the `variable <name> <style> <value>` declarations of known variables.
///
/// A line is rewritten iff, after trimming, its first token is `variable` and its
/// second token names an entry of `values`. The style keyword (`equal`, `string`, ...)
/// of the template line is kept. All other lines pass through unchanged, and entries
/// of `values` the template never declares are ignored.
pub fn rewrite<'a>(
    template_lines: impl IntoIterator<Item = &'a str>,
    values: &ParameterMap,
    decimals: &DecimalsMap,
) -> Vec<String> {
    template_lines
        .into_iter()
        .map(|line| rewrite_line(line, values, decimals).unwrap_or_else(|| line.to_string()))
        .collect()
}

/// [`rewrite`] over a whole text, keeping its trailing newline.
pub fn rewrite_text(template: &str, values: &ParameterMap, decimals: &DecimalsMap) -> String {
    let (lines, trailing_newline) = split_lines(template);
    let rewritten = rewrite(lines.iter().map(String::as_str), values, decimals);
    join_lines(&rewritten, trailing_newline)
}

fn rewrite_line(line: &str, values: &ParameterMap, decimals: &DecimalsMap) -> Option<String> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != DECLARATION_KEYWORD {
        return None;
    }
    let name = tokens.next()?;
    let value = values.get(name)?;
    let style = tokens.next().unwrap_or("equal");
    let rendered = format_value(value, decimals.get(name).copied());
    Some(format!(
        "{DECLARATION_KEYWORD} {name} {style} {rendered}{}",
        carriage_return(line)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
# Slab
variable Lx equal 1.0
variable rho_fluid   equal 0.5
variable name string old
  variable nrun equal 1000
variable untouched equal 3
pair_style lj/cut ${rcutLJ11}
";

    fn values() -> ParameterMap {
        let mut map = ParameterMap::new();
        map.insert("Lx".into(), ParameterValue::Float(10.0));
        map.insert("rho_fluid".into(), ParameterValue::Float(0.8));
        map.insert("name".into(), ParameterValue::from("WCA_H8"));
        map.insert("nrun".into(), ParameterValue::Integer(500000));
        map.insert("never_declared".into(), ParameterValue::Integer(1));
        map
    }

    #[test]
    fn rewrites_only_declared_known_variables() {
        let out = rewrite_text(TEMPLATE, &values(), &DecimalsMap::new());
        let expected = "\
# Slab
variable Lx equal 10.0
variable rho_fluid equal 0.8
variable name string WCA_H8
variable nrun equal 500000
variable untouched equal 3
pair_style lj/cut ${rcutLJ11}
";
        assert_eq!(out, expected);
    }

    #[test]
    fn applies_fixed_decimals_per_variable() {
        let mut decimals = DecimalsMap::new();
        decimals.insert("Lx".into(), 2);
        decimals.insert("nrun".into(), 1);
        decimals.insert("name".into(), 3);
        let out = rewrite_text(TEMPLATE, &values(), &decimals);
        assert!(out.contains("variable Lx equal 10.00\n"));
        assert!(out.contains("variable nrun equal 500000.0\n"));
        assert!(out.contains("variable name string WCA_H8\n"));
    }

    #[test]
    fn keeps_line_count_and_changes_only_targeted_lines() {
        let template_lines: Vec<&str> = TEMPLATE.lines().collect();
        let mut exact = ParameterMap::new();
        for name in ["Lx", "rho_fluid", "name", "nrun", "untouched"] {
            exact.insert(name.into(), ParameterValue::Integer(7));
        }
        let out = rewrite(template_lines.iter().copied(), &exact, &DecimalsMap::new());

        assert_eq!(out.len(), template_lines.len());
        let changed: Vec<usize> = out
            .iter()
            .zip(&template_lines)
            .enumerate()
            .filter(|(_, (new, old))| new.as_str() != **old)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(changed, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ignores_lines_that_merely_mention_variables() {
        let lines = ["print \"variable Lx equal 3\"", "variables Lx equal 3", "variable"];
        let out = rewrite(lines, &values(), &DecimalsMap::new());
        assert_eq!(out, lines.map(String::from).to_vec());
    }

    #[test]
    fn crlf_templates_keep_their_line_endings() {
        let out = rewrite_text(
            "variable Lx equal 1.0\r\nunits lj\r\n",
            &values(),
            &DecimalsMap::new(),
        );
        assert_eq!(out, "variable Lx equal 10.0\r\nunits lj\r\n");
    }

    #[test]
    fn format_value_falls_back_to_default_conversion() {
        assert_eq!(format_value(&ParameterValue::Float(0.8), None), "0.8");
        assert_eq!(format_value(&ParameterValue::Integer(4), Some(2)), "4.00");
        assert_eq!(format_value(&ParameterValue::from("enp5"), Some(2)), "enp5");
    }
}
