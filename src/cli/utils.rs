use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print `key: value` lines for a JSON object, or the whole document as JSON
pub fn output_fields(output_format: &OutputFormat, data: &Value) -> anyhow::Result<()> {
    match (output_format, data) {
        (OutputFormat::Text, Value::Object(map)) => {
            for (key, value) in map {
                match value {
                    Value::String(s) => println!("{}: {}", key, s),
                    Value::Null => println!("{}: -", key),
                    other => println!("{}: {}", key, other),
                }
            }
        }
        _ => println!("{}", serde_json::to_string_pretty(data)?),
    }
    Ok(())
}

/// Unwrap the `{"success": true, "data": ...}` envelope or surface the API error
pub async fn read_envelope(response: reqwest::Response) -> anyhow::Result<Value> {
    let status = response.status();
    if status == reqwest::StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }
    if status.is_redirection() {
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("?")
            .to_string();
        anyhow::bail!("Access denied; server redirected to {}", location);
    }

    let body: Value = response.json().await?;
    if status.is_success() {
        return Ok(body.get("data").cloned().unwrap_or(Value::Null));
    }

    let message = body.get("message").and_then(Value::as_str).unwrap_or("request failed");
    anyhow::bail!("{} ({})", message, status)
}
