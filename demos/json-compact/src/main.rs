use std::process::ExitCode;

use tagged_json::{parse, stringify, Value};
use tracing_subscriber::EnvFilter;

// Drops insignificant whitespace and reports what the document holds.
// Set RUST_LOG=tagged_json=debug to see where malformed input went wrong.

fn describe(value: &Value) -> String {
    match value.entry_count() {
        Some(n) => format!("{} with {} entries", value.type_name(), n),
        None => value.type_name().to_string(),
    }
}

fn compact(doc: &str) -> Result<String, tagged_json::ParsingError> {
    let value = parse(doc)?;
    eprintln!("top level: {}", describe(&value));
    Ok(stringify(&value))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let doc = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("cannot read {}: {}", path, e);
                return ExitCode::FAILURE
            }
        },
        None => String::from(r#"{
    "breakfast": [ "bacon", "eggs", "spam" ],
    "counts": { "eggs": 2, "spam": 12 },
    "price": 4.50,
    "served": true
}"#),
    };

    match compact(&doc) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact() {
        let out = compact("{ \"a\" : [ 1 , 2 ] ,\n \"b\" : \"c\" }").unwrap();
        assert_eq!(out, "{\"a\":[1,2],\"b\":\"c\"}");
    }

    #[test]
    fn test_compact_rejects_truncated() {
        assert!(compact("{\"a\":[1,").is_err());
    }
}
