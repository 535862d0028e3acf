use crate::error::{AppError, AppResult};

/// Substitute `{name}` / `${name}` placeholders in `template` with `args`, in
/// order of appearance.
///
/// A placeholder opens at `{` or `$` and closes at the next `}`. A placeholder
/// left open at the end of the template is copied as-is and not counted.
pub fn replace_uri_placeholders<S: AsRef<str>>(template: &str, args: &[S]) -> AppResult<String> {
    let mut buffer = String::with_capacity(template.len());
    let mut pending = String::new();
    let mut in_placeholder = false;
    let mut placeholders = 0usize;

    for symbol in template.chars() {
        if in_placeholder {
            pending.push(symbol);
            if symbol == '}' {
                if let Some(arg) = args.get(placeholders) {
                    buffer.push_str(arg.as_ref());
                }
                placeholders += 1;
                pending.clear();
                in_placeholder = false;
            }
        } else if symbol == '{' || symbol == '$' {
            in_placeholder = true;
            pending.push(symbol);
        } else {
            buffer.push(symbol);
        }
    }
    buffer.push_str(&pending);

    if placeholders != args.len() {
        return Err(AppError::TemplateMismatch {
            template: template.to_string(),
            placeholders,
            arguments: args.len(),
        });
    }
    Ok(buffer)
}
