//! Status message formatting helpers

use serde::Serialize;
use serde_json::json;
use tally_core::error::Result;

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a JSON status message with optional fields
///
/// ```ignore
/// print_json_status("ok", Some("Store initialized"), &[("store", json!(path))])?;
/// ```
pub fn print_json_status(
    status: &str,
    message: Option<&str>,
    extra_fields: &[(&str, serde_json::Value)],
) -> Result<()> {
    let mut output = json!({ "status": status });

    if let Some(obj) = output.as_object_mut() {
        if let Some(msg) = message {
            obj.insert("message".to_string(), json!(msg));
        }
        for (key, value) in extra_fields {
            obj.insert(key.to_string(), value.clone());
        }
    }

    print_json(&output)
}

/// Print the `H` header line that opens every records output
pub fn print_records_header(mode: &str, extra_fields: &[(&str, &str)]) {
    let mut parts = vec!["H tally=1 records=1".to_string(), format!("mode={}", mode)];

    for (key, value) in extra_fields {
        parts.push(format!("{}={}", key, value));
    }

    println!("{}", parts.join(" "));
}
