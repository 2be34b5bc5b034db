use anyhow::{Context, Result};
use url::Url;

use crate::assignment::Assignment;
use crate::course::Course;

pub const API_PATH: &str = "api/v1";

/// `path` under the API root of `base_url`. A path in `base_url`, e.g. `https://host/canvas`, is
/// kept.
pub fn api_url(base_url: &Url, path: &str) -> Result<Url> {
    let mut root = base_url.clone();
    if !root.path().ends_with('/') {
        root.set_path(&format!("{}/", root.path()));
    }
    root.join(&format!("{API_PATH}{path}"))
        .with_context(|| format!("could not build API URL for `{path}` on `{base_url}`"))
}

pub fn course_path(course: &Course, path: &str) -> String {
    format!("/courses/{}{path}", course.id())
}

pub fn assignment_path(course: &Course, assignment: &Assignment, path: &str) -> String {
    course_path(course, &format!("/assignments/{}{path}", assignment.id()))
}

/// Appends query pairs in order. Canvas list parameters such as `include[]` repeat the key, so this
/// takes pairs rather than a map.
pub fn with_query<'a>(mut url: Url, pairs: impl IntoIterator<Item = (&'a str, String)>) -> Url {
    let mut pairs = pairs.into_iter().peekable();
    if pairs.peek().is_some() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base_url: &str, path: &str) -> String {
        api_url(&Url::parse(base_url).unwrap(), path)
            .unwrap()
            .to_string()
    }

    #[test]
    fn api_urls_sit_under_the_base_path() {
        assert_eq!(
            api("https://canvas.example.edu", "/courses"),
            "https://canvas.example.edu/api/v1/courses"
        );
        assert_eq!(
            api("https://example.edu/canvas", "/users/self"),
            "https://example.edu/canvas/api/v1/users/self"
        );
        assert_eq!(
            api("https://example.edu/canvas/", "/users/self"),
            "https://example.edu/canvas/api/v1/users/self"
        );
    }

    #[test]
    fn empty_query_adds_no_question_mark() {
        let url = Url::parse("https://canvas.example.edu/api/v1/users/self").unwrap();
        assert_eq!(with_query(url.clone(), Vec::<(&str, String)>::new()).as_str(), url.as_str());
        assert_eq!(
            with_query(url, [("include[]", "submission".to_owned())]).as_str(),
            "https://canvas.example.edu/api/v1/users/self?include%5B%5D=submission"
        );
    }
}
