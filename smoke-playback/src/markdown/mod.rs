//! Reading recorded interactions from markdown files.
//!
//! Every interaction is a level-two heading followed by four fenced blocks:
//!
//! ````text
//! ## Interaction 0: GET /posts/1
//!
//! ### Request headers recorded for playback:
//!
//! ```
//! accept: */*
//! ```
//!
//! ### Request body recorded for playback ():
//!
//! ```
//! ```
//!
//! ### Response headers recorded for playback:
//!
//! ```
//! Content-Type: application/json; charset=utf-8
//! ```
//!
//! ### Response body recorded for playback (200: application/json; charset=utf-8):
//!
//! ```
//! {"userId":1,"id":1}
//! ```
//! ````

pub mod error;

use crate::{InteractionData, RequestData, ResponseData};
use error::Error;
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::HashMap, fs, path::Path};

lazy_static! {
    static ref HEADER_REGEX: Regex =
        Regex::new(r"(?m)(?P<header_key>[a-zA-Z0-9\-]+): (?P<header_value>.*?)$").unwrap();
    static ref MARKDOWN_REGEX: Regex = Regex::new(
        "(?ms)\
            ^\\#\\# Interaction (?P<interaction_number>[0-9]+): (?P<http_method>[A-Z]+) (?P<uri>\\S+)\\s*\
            \\#\\#\\# Request headers recorded for playback.*?\
            ```\\s*(?P<request_headers_part>.*?)\\s*```.*?\
            \\#\\#\\# Request body recorded for playback.*?\
            ```\\s*(?P<request_body_part>.*?)\\s*```.*?\
            \\#\\#\\# Response headers recorded for playback.*?\
            ```\\s*(?P<response_headers_part>.*?)\\s*```.*?\
            \\#\\#\\# Response body recorded for playback \\((?P<status_code>[0-9]+)[^)]*\\).*?\
            ```\\s*(?P<response_body_part>.*?)\\s*```"
    )
    .unwrap();
}

pub fn load_markdown<P: AsRef<Path>>(filename: P) -> Result<Vec<InteractionData>, Error> {
    let file_contents = fs::read_to_string(filename)?;
    parse_markdown(&file_contents)
}

pub fn parse_markdown(markdown: &str) -> Result<Vec<InteractionData>, Error> {
    let mut data = Vec::new();

    for captures in MARKDOWN_REGEX.captures_iter(markdown) {
        let interaction_number = captures["interaction_number"]
            .parse()
            .map_err(|_| Error::InvalidInteractionNumber)?;
        let status_code = captures["status_code"]
            .parse()
            .map_err(|_| Error::InvalidStatusCode)?;

        data.push(InteractionData {
            interaction_number,
            request_data: RequestData {
                uri: captures["uri"].into(),
                method: captures["http_method"].into(),
                headers: parse_headers(&captures["request_headers_part"]),
                body: captures["request_body_part"].into(),
            },
            response_data: ResponseData {
                status_code,
                headers: parse_headers(&captures["response_headers_part"]),
                body: captures["response_body_part"].into(),
            },
        });
    }

    if data.is_empty() {
        Err(Error::InvalidMarkdownFormat)
    } else {
        Ok(data)
    }
}

fn parse_headers<T: AsRef<str>>(headers_part: T) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for capture in HEADER_REGEX.captures_iter(headers_part.as_ref()) {
        headers.insert(
            String::from(capture["header_key"].trim()),
            String::from(capture["header_value"].trim()),
        );
    }

    headers
}
