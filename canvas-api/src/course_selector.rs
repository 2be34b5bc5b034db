use crate::course::Course;

/// Picks one course out of a list by id, course code, or name, in that order.
#[derive(Debug, Clone)]
pub struct CourseSelector {
    selector: String,
}

impl CourseSelector {
    pub fn new(selector: String) -> Self {
        Self { selector }
    }

    pub fn as_str(&self) -> &str {
        &self.selector
    }

    pub fn select_from<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        self.select_as_id(courses)
            .or_else(|| self.select_as_course_code(courses))
            .or_else(|| self.select_as_name(courses))
    }

    fn select_as_id<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        courses
            .iter()
            .find(|course| course.id().to_string() == self.selector)
    }

    fn select_as_course_code<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        courses
            .iter()
            .find(|course| course.course_code() == Some(self.selector.as_str()))
    }

    fn select_as_name<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        courses
            .iter()
            .find(|course| course.name() == Some(self.selector.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseId;

    fn courses() -> Vec<Course> {
        vec![
            Course::new(
                CourseId::new(101),
                Some("Algorithms".to_owned()),
                Some("CS-320".to_owned()),
            ),
            // A course whose code looks like another course's id
            Course::new(
                CourseId::new(202),
                Some("Operating Systems".to_owned()),
                Some("101".to_owned()),
            ),
            Course::new(CourseId::new(303), None, None),
        ]
    }

    fn select(selector: &str) -> Option<CourseId> {
        let courses = courses();
        CourseSelector::new(selector.to_owned())
            .select_from(&courses)
            .map(Course::id)
    }

    #[test]
    fn id_wins_over_course_code() {
        assert_eq!(select("101"), Some(CourseId::new(101)));
    }

    #[test]
    fn selects_by_course_code_then_name() {
        assert_eq!(select("CS-320"), Some(CourseId::new(101)));
        assert_eq!(select("Operating Systems"), Some(CourseId::new(202)));
        assert_eq!(select("303"), Some(CourseId::new(303)));
    }

    #[test]
    fn unknown_selector_selects_nothing() {
        assert_eq!(select("Underwater Basket Weaving"), None);
    }
}
