//! JSON line I/O
//!
//! - Input: one JSON object per line
//! - Output: one JSON object per line
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read one JSON value from the first line of `reader`
pub fn read_request<R: BufRead>(reader: &mut R) -> CliResult<Value> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    let value: Value = serde_json::from_str(&line)?;
    Ok(value)
}

/// Success envelope
pub fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope
pub fn error_response(code: &str, http_status: u16, message: &str, retryable: bool) -> Value {
    json!({
        "status": "error",
        "code": code,
        "httpStatus": http_status,
        "message": message,
        "retryable": retryable
    })
}

/// Write one JSON value followed by a newline, then flush
pub fn write_json<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_request_first_line() {
        let mut input = Cursor::new("{\"a\":1}\n{\"b\":2}\n");
        assert_eq!(read_request(&mut input).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_read_request_empty() {
        let mut input = Cursor::new("\n");
        assert_eq!(
            read_request(&mut input).unwrap_err().code_str(),
            "PIZZA_CLI_IO_ERROR"
        );
    }

    #[test]
    fn test_write_json_is_one_line() {
        let mut out = Vec::new();
        write_json(&mut out, &error_response("X", 403, "no", false)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
    }
}
