//! Query parameters shared by every read endpoint: `page`, `size`,
//! `projection` and repeated `embed`.

use crate::{
    config::RestConfig,
    repository::{Pageable, Projection},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadParams {
    pub pageable: Pageable,
    pub projection: Projection,
}

pub fn parse_read_params(query: Option<&str>, rest: &RestConfig) -> Result<ReadParams> {
    let mut page = 0u64;
    let mut size = u64::from(rest.default_page_size);
    let mut full = false;
    let mut embeds = Vec::new();

    for (key, value) in url::form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
        match key.as_ref() {
            "page" => page = parse_number("page", &value)?,
            "size" => {
                size = parse_number("size", &value)?;
                if size == 0 {
                    return Err(Error::InvalidRequest("size must be at least 1".to_string()));
                }
            }
            "projection" => match value.as_ref() {
                "full" => full = true,
                "default" | "" => {}
                other => {
                    return Err(Error::InvalidRequest(format!("Unknown projection '{other}'")))
                }
            },
            "embed" => embeds.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|rel| !rel.is_empty())
                    .map(str::to_string),
            ),
            // Unrecognised parameters (e.g. `sort`) are ignored.
            _ => {}
        }
    }

    let size = size.min(u64::from(rest.max_page_size));
    // The row offset must fit a SQL bigint.
    if page.checked_mul(size).map_or(true, |offset| offset > i64::MAX as u64) {
        return Err(Error::InvalidRequest(format!("page {page} is out of range")));
    }
    let projection = if full {
        Projection::full()
    } else {
        Projection::with_embeds(embeds)
    };

    Ok(ReadParams {
        pageable: Pageable::new(page, size),
        projection,
    })
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidRequest(format!("{name} must be a non-negative integer, got '{value}'")))
}
