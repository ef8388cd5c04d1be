use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ServiceError;
use crate::pagination::PageResult;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Report a service failure, keeping its stable error code in JSON output
pub fn output_service_error(output_format: &OutputFormat, error: &ServiceError) -> anyhow::Result<()> {
    output_error(output_format, &error.to_string(), Some(error.error_code()))
}

/// Output one page of results; `line` renders a row for text output
pub fn output_page<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    page: &PageResult<T>,
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(page)?);
        }
        OutputFormat::Text => {
            if page.data.is_empty() {
                println!("No {} found", collection_name);
            }
            for row in &page.data {
                println!("{}", line(row));
            }
            println!("{}", page_footer(page));
        }
    }
    Ok(())
}

/// Output a single record as pretty JSON, or its text rendering
pub fn output_item<T: Serialize>(output_format: &OutputFormat, item: &T, text: impl Fn(&T) -> String) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Text => println!("{}", text(item)),
    }
    Ok(())
}

fn page_footer<T>(page: &PageResult<T>) -> String {
    let meta = &page.meta;
    let mut footer = format!(
        "-- page {} of {} ({} total, {} per page)",
        meta.current_page, meta.last_page, meta.total, meta.per_page
    );
    if let Some(prev) = meta.prev {
        footer.push_str(&format!(" prev={}", prev));
    }
    if let Some(next) = meta.next {
        footer.push_str(&format!(" next={}", next));
    }
    footer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::{PageMeta, PageRequest};

    #[test]
    fn footer_shows_neighbours() {
        let page = PageResult {
            data: vec![1, 2],
            meta: PageMeta::new(25, &PageRequest::new(2, 10).unwrap()),
        };
        assert_eq!(page_footer(&page), "-- page 2 of 3 (25 total, 10 per page) prev=1 next=3");
    }

    #[test]
    fn footer_for_empty_collection() {
        let page: PageResult<u8> = PageResult { data: vec![], meta: PageMeta::new(0, &PageRequest::default()) };
        assert_eq!(page_footer(&page), "-- page 1 of 0 (0 total, 10 per page)");
    }
}
