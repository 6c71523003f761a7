//! Script format handling for invocation records and result output
//!
//! This module centralizes all script format concerns, providing:
//! - Conversion from raw CSV fields to invocations
//! - Result row rendering (status and payload)
//! - Result output serialization
//!
//! A script is header-less CSV. The first field of a record is the function
//! name, the remaining fields are its arguments. Blank records and records
//! whose first field starts with `#` are skipped.
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::ProcessingResult;
use crate::types::{Function, Invocation, Sequence};
use std::io::Write;

/// Marker that turns a record into a comment
pub const COMMENT_PREFIX: char = '#';

/// Output header
pub const RESULT_HEADER: [&str; 4] = ["seq", "function", "status", "payload"];

/// Convert one record's trimmed fields into an invocation
///
/// # Returns
///
/// `None` for comments and records whose fields are all empty.
pub fn convert_script_record<'a, I>(seq: Sequence, fields: I) -> Option<Invocation>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = fields.into_iter();
    let function = fields.next()?;
    let args: Vec<String> = fields.map(str::to_string).collect();

    if function.starts_with(COMMENT_PREFIX) {
        return None;
    }
    if function.is_empty() && args.iter().all(String::is_empty) {
        return None;
    }

    Some(Invocation {
        seq,
        function: function.to_string(),
        args,
    })
}

/// Render the `status` and `payload` columns of a result row
///
/// Failed reads render the structured query payload; other failures render
/// the error text. Successful bodies are written as UTF-8.
pub fn render_result(result: &ProcessingResult) -> (&'static str, String) {
    match &result.result {
        Ok(body) => ("ok", String::from_utf8_lossy(body).into_owned()),
        Err(e) => {
            let is_query = result
                .invocation
                .function
                .parse::<Function>()
                .is_ok_and(Function::is_query);
            if is_query {
                ("error", e.query_payload())
            } else {
                ("error", e.to_string())
            }
        }
    }
}

/// Write results to output in CSV format
///
/// Rows are sorted by sequence number for deterministic output.
pub fn write_results_csv(
    results: &[ProcessingResult],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(RESULT_HEADER)
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted: Vec<&ProcessingResult> = results.iter().collect();
    sorted.sort_by_key(|result| result.invocation.seq);

    for result in sorted {
        let (status, payload) = render_result(result);
        writer
            .write_record([
                result.invocation.seq.to_string().as_str(),
                result.invocation.function.as_str(),
                status,
                payload.as_str(),
            ])
            .map_err(|e| format!("Failed to write result record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerError;
    use rstest::rstest;

    fn processed(
        seq: Sequence,
        function: &str,
        result: Result<Vec<u8>, LedgerError>,
    ) -> ProcessingResult {
        ProcessingResult {
            invocation: Invocation::new(seq, function, vec![]),
            result,
        }
    }

    #[test]
    fn test_convert_record_splits_function_and_args() {
        let invocation =
            convert_script_record(4, ["transaction", "alice", "bob", "300.0"]).unwrap();
        assert_eq!(invocation.seq, 4);
        assert_eq!(invocation.function, "transaction");
        assert_eq!(invocation.args, vec!["alice", "bob", "300.0"]);
    }

    #[rstest]
    #[case::comment(&["# setup", "ignored"])]
    #[case::comment_without_space(&["#transaction", "a", "b", "1"])]
    #[case::blank(&[""])]
    #[case::blank_fields(&["", "", ""])]
    #[case::no_fields(&[])]
    fn test_convert_record_skips(#[case] fields: &[&str]) {
        assert_eq!(convert_script_record(1, fields.iter().copied()), None);
    }

    #[test]
    fn test_convert_record_keeps_empty_function_with_args() {
        // dispatching it reports the unknown function
        let invocation = convert_script_record(1, ["", "alice"]).unwrap();
        assert_eq!(invocation.function, "");
    }

    #[rstest]
    #[case::ok_body(processed(1, "GetCompany", Ok(b"{}".to_vec())), "ok", "{}")]
    #[case::ok_empty(processed(1, "transaction", Ok(vec![])), "ok", "")]
    #[case::write_error(
        processed(1, "transaction", Err(LedgerError::account_not_found("carol"))),
        "error",
        "Account not found: carol"
    )]
    #[case::query_error(
        processed(1, "query", Err(LedgerError::entity_not_found("a"))),
        "error",
        r#"{"Error":"Nil amount for a"}"#
    )]
    #[case::get_company_error(
        processed(1, "GetCompany", Err(LedgerError::account_not_found("carol"))),
        "error",
        r#"{"Error":"Account not found: carol"}"#
    )]
    fn test_render_result(
        #[case] result: ProcessingResult,
        #[case] status: &str,
        #[case] payload: &str,
    ) {
        assert_eq!(render_result(&result), (status, payload.to_string()));
    }

    #[test]
    fn test_write_results_csv_sorts_and_quotes() {
        let results = vec![
            processed(2, "transaction", Ok(vec![])),
            processed(1, "createAccount", Ok(br#"{"id":"a"}"#.to_vec())),
        ];
        let mut output = Vec::new();

        write_results_csv(&results, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "seq,function,status,payload\n\
             1,createAccount,ok,\"{\"\"id\"\":\"\"a\"\"}\"\n\
             2,transaction,ok,\n"
        );
    }

    #[test]
    fn test_write_results_csv_empty() {
        let mut output = Vec::new();
        write_results_csv(&[], &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "seq,function,status,payload\n");
    }
}
