//! Following Canvas's `Link` header pagination.
//!
//! Canvas list endpoints return one page of a JSON array at a time, and name the next page (if any)
//! in a `Link: <url>; rel="next"` header, as described in RFC 5988.

use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use async_stream::try_stream;
use futures::{Stream, TryStreamExt};
use nom::branch::alt;
use nom::bytes::complete::{take_until, take_while, take_while1};
use nom::character::complete::{char, space0};
use nom::combinator::{eof, opt};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, preceded, tuple};
use nom::{IResult, Parser};
use reqwest::Response;
use reqwest::header::LINK;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::client::Client;

impl Client {
    /// Every page of the list at `url`, in order.
    pub fn pages<T: DeserializeOwned>(&self, url: Url) -> impl Stream<Item = Result<Vec<T>>> {
        try_stream! {
            let mut visited = HashSet::new();
            let mut next = Some(url);
            let mut page_number = 0;

            while let Some(url) = next.take() {
                if !visited.insert(url.clone()) {
                    Err::<(), _>(anyhow!("pagination loops back to already fetched page {url}"))?;
                }
                page_number += 1;

                let response = self.get(url.clone()).await?;
                next = next_page_url(&response);

                let page: Vec<T> = response
                    .json()
                    .await
                    .with_context(|| format!("page {page_number} from {url} is not the expected JSON array"))?;
                debug!(page_number, items = page.len(), has_next = next.is_some(), "fetched page");

                yield page;
            }
        }
    }

    /// The whole list at `url`, following `rel="next"` links until there are none.
    pub async fn get_paginated<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        self.pages(url).try_concat().await
    }
}

/// The next page named by the response's `Link` headers, resolved against the response URL.
///
/// Malformed headers are logged and treated as if there were no next page.
fn next_page_url(response: &Response) -> Option<Url> {
    let values: Vec<&str> = response
        .headers()
        .get_all(LINK)
        .iter()
        .filter_map(|value| match value.to_str() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%err, "ignoring non-text Link header");
                None
            }
        })
        .collect();
    if values.is_empty() {
        return None;
    }

    let header = values.join(",");
    let uri = match next_link(&header) {
        Ok(uri) => uri?,
        Err(err) => {
            warn!(%err, %header, "ignoring malformed Link header");
            return None;
        }
    };

    match response.url().join(uri) {
        Ok(url) => Some(url),
        Err(err) => {
            warn!(%err, uri, "ignoring unusable next page link");
            None
        }
    }
}

/// One `<uri>; param=value; ...` element of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkValue<'a> {
    uri: &'a str,
    params: Vec<(&'a str, &'a str)>,
}

impl<'a> LinkValue<'a> {
    pub fn uri(&self) -> &'a str {
        self.uri
    }

    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    /// `rel` may hold several space separated relation types, which compare case-insensitively.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.param("rel")
            .is_some_and(|rels| rels.split_whitespace().any(|r| r.eq_ignore_ascii_case(rel)))
    }
}

pub fn parse_link_header(header: &str) -> Result<Vec<LinkValue<'_>>> {
    link_header(header)
        .map(|(_, links)| links)
        .map_err(|err| anyhow!("could not parse Link header: {err}"))
}

/// The URI of the first `rel="next"` link, if there is one.
pub fn next_link(header: &str) -> Result<Option<&str>> {
    Ok(parse_link_header(header)?
        .into_iter()
        .find(|link| link.has_rel("next"))
        .map(|link| link.uri()))
}

fn link_header(text: &str) -> IResult<&str, Vec<LinkValue<'_>>> {
    let separator = tuple((space0, many0(tuple((char(','), space0))))).map(|_| ());
    delimited(
        tuple((space0, many0(tuple((char(','), space0))))),
        separated_list1(tuple((space0, char(','), separator)), link_value),
        tuple((space0, many0(tuple((char(','), space0))), eof)),
    )(text)
}

fn link_value(text: &str) -> IResult<&str, LinkValue<'_>> {
    tuple((
        uri_reference,
        many0(preceded(tuple((space0, char(';'), space0)), link_param)),
    ))
    .map(|(uri, params)| LinkValue { uri, params })
    .parse(text)
}

fn uri_reference(text: &str) -> IResult<&str, &str> {
    delimited(char('<'), take_until(">"), char('>'))(text)
}

fn link_param(text: &str) -> IResult<&str, (&str, &str)> {
    tuple((
        token,
        opt(preceded(tuple((space0, char('='), space0)), param_value)),
    ))
    .map(|(name, value)| (name, value.unwrap_or_default()))
    .parse(text)
}

fn param_value(text: &str) -> IResult<&str, &str> {
    alt((quoted_string, token))(text)
}

fn quoted_string(text: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c| c != '"'), char('"'))(text)
}

fn token(text: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS_LINK: &str = concat!(
        r#"<https://canvas.example.edu/api/v1/users/self/courses?page=1&per_page=10>; rel="current","#,
        r#"<https://canvas.example.edu/api/v1/users/self/courses?page=2&per_page=10>; rel="next","#,
        r#"<https://canvas.example.edu/api/v1/users/self/courses?page=1&per_page=10>; rel="first","#,
        r#"<https://canvas.example.edu/api/v1/users/self/courses?page=4&per_page=10>; rel="last""#,
    );

    #[test]
    fn finds_next_in_canvas_header() {
        assert_eq!(
            next_link(CANVAS_LINK).unwrap(),
            Some("https://canvas.example.edu/api/v1/users/self/courses?page=2&per_page=10")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let header = concat!(
            r#"<https://canvas.example.edu/api/v1/courses?page=4>; rel="current", "#,
            r#"<https://canvas.example.edu/api/v1/courses?page=3>; rel="prev", "#,
            r#"<https://canvas.example.edu/api/v1/courses?page=1>; rel="first""#,
        );
        assert_eq!(next_link(header).unwrap(), None);
    }

    #[test]
    fn rel_may_be_bare_uppercase_or_listed() {
        assert_eq!(next_link("</p2>; rel=next").unwrap(), Some("/p2"));
        assert_eq!(next_link("</p2>;rel=\"NEXT\"").unwrap(), Some("/p2"));
        assert_eq!(
            next_link(r#"</p5>; rel="last next"; title="end""#).unwrap(),
            Some("/p5")
        );
    }

    #[test]
    fn comma_inside_uri_does_not_split_links() {
        let header = r#"<https://x.test/a?ids=1,2,3>; rel="next", <https://x.test/a?page=1>; rel="first""#;
        assert_eq!(next_link(header).unwrap(), Some("https://x.test/a?ids=1,2,3"));
    }

    #[test]
    fn parameters_are_kept() {
        let links = parse_link_header(r#"</a>; rel="next"; type="application/json"; anchor"#).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].uri(), "/a");
        assert_eq!(links[0].param("TYPE"), Some("application/json"));
        assert_eq!(links[0].param("anchor"), Some(""));
    }

    #[test]
    fn malformed_headers_are_errors() {
        assert!(next_link("").is_err());
        assert!(next_link("https://x.test/a; rel=next").is_err());
        assert!(next_link("<https://x.test/a; rel=next").is_err());
    }

    #[test]
    fn stray_commas_are_tolerated() {
        assert_eq!(next_link(", </b>; rel=next,,").unwrap(), Some("/b"));
    }
}
