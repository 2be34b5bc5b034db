use canvas_api::assignment::{Assignment, IncludeSubmission};
use canvas_api::assignment_group::AssignmentGroup;
use canvas_api::calendar_event::CalendarEventQuery;
use canvas_api::client::Client;
use canvas_api::config::{Config, Token, parse_base_url};
use canvas_api::course::{Course, EnrollmentState};
use canvas_api::types::{AssignmentGroupId, AssignmentId, CourseId, UserId};
use canvas_api::user::User;
use mockito::{Matcher, Server};
use serde_json::json;

fn client(server: &Server) -> Client {
    let config = Config::new(
        parse_base_url(&server.url()).unwrap(),
        Token::new("test-token".to_owned()),
    )
    .with_per_page(50);
    Client::new(config)
}

fn course() -> Course {
    Course::new(CourseId::new(42), Some("Compilers".to_owned()), None)
}

#[tokio::test]
async fn lists_courses_for_enrollment_state() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/users/self/courses")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("enrollment_state".into(), "completed".into()),
            Matcher::UrlEncoded("per_page".into(), "50".into()),
        ]))
        .match_header("authorization", "Bearer test-token")
        .match_header("accept", "application/json")
        .with_body(
            json!([
                {"id": 42, "name": "Compilers", "course_code": "CS-480"},
                {"id": 43, "access_restricted_by_date": true}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let courses = client(&server)
        .list_courses(EnrollmentState::Completed)
        .await
        .unwrap();

    assert_eq!(courses.len(), 2);
    assert_eq!(courses[0].course_code(), Some("CS-480"));
    assert_eq!(courses[1].name(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn lists_assignment_groups_of_a_course() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/courses/42/assignment_groups")
        .match_query(Matcher::UrlEncoded("per_page".into(), "50".into()))
        .with_body(
            json!([
                {"id": 7, "name": "Homework", "group_weight": 40},
                {"id": 8, "name": "Exams", "group_weight": null}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let groups = client(&server)
        .list_assignment_groups(&course())
        .await
        .unwrap();

    assert_eq!(groups[0].id(), AssignmentGroupId::new(7));
    assert_eq!(groups[0].group_weight().unwrap().to_string(), "40");
    assert!(groups[1].group_weight().is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn asks_for_embedded_submissions_only_when_told() {
    let mut server = Server::new_async().await;
    let group = AssignmentGroup::new(AssignmentGroupId::new(7), "Homework".to_owned(), None);

    let with_submission = server
        .mock("GET", "/api/v1/courses/42/assignment_groups/7/assignments")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "50".into()),
            Matcher::UrlEncoded("include[]".into(), "submission".into()),
        ]))
        .with_body(
            json!([{
                "id": 100,
                "name": "HW1",
                "due_at": "2024-09-06T05:59:59Z",
                "points_possible": 10.0,
                "submission": {"score": 10.0, "submitted_at": "2024-09-05T01:00:00Z", "late": true}
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let assignments = client(&server)
        .list_assignments_in_group(&course(), &group, IncludeSubmission::Yes)
        .await
        .unwrap();
    let submission = assignments[0].submission().unwrap();
    assert!(submission.is_submitted());
    assert!(submission.is_late());
    with_submission.assert_async().await;

    let without_submission = server
        .mock("GET", "/api/v1/courses/42/assignment_groups/7/assignments")
        .match_query(Matcher::Exact("per_page=50".into()))
        .with_body(json!([{"id": 100, "name": "HW1"}]).to_string())
        .create_async()
        .await;

    let assignments = client(&server)
        .list_assignments_in_group(&course(), &group, IncludeSubmission::No)
        .await
        .unwrap();
    assert!(assignments[0].submission().is_none());
    without_submission.assert_async().await;
}

#[tokio::test]
async fn own_submission_is_none_on_404() {
    let mut server = Server::new_async().await;
    let assignment = Assignment::new(AssignmentId::new(100), "HW1".to_owned(), None, None);
    server
        .mock("GET", "/api/v1/courses/42/assignments/100/submissions/self")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"errors":[{"message":"The specified resource does not exist."}]}"#)
        .create_async()
        .await;

    let submission = client(&server)
        .get_own_submission(&course(), &assignment)
        .await
        .unwrap();

    assert!(submission.is_none());
}

#[tokio::test]
async fn own_submission_other_errors_propagate() {
    let mut server = Server::new_async().await;
    let assignment = Assignment::new(AssignmentId::new(100), "HW1".to_owned(), None, None);
    server
        .mock("GET", "/api/v1/courses/42/assignments/100/submissions/self")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"status":"unauthorized","message":"not allowed"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .get_own_submission(&course(), &assignment)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("not allowed"), "{err:#}");
}

#[tokio::test]
async fn course_grade_comes_from_first_enrollment() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/courses/42/enrollments")
        .match_query(Matcher::UrlEncoded("user_id".into(), "self".into()))
        .with_body(
            json!([
                {"grades": {"current_score": 88.5, "current_grade": "B+", "final_score": 60.0, "final_grade": "D-"}},
                {"grades": {"current_score": 10.0, "current_grade": "F"}}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let grades = client(&server)
        .get_course_grade(&course())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(grades.current_grade.as_deref(), Some("B+"));
    assert_eq!(grades.current_score.unwrap().to_string(), "88.5");
    assert_eq!(grades.final_grade.as_deref(), Some("D-"));
}

#[tokio::test]
async fn course_grade_is_none_without_enrollments() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/courses/42/enrollments")
        .match_query(Matcher::Any)
        .with_body("[]")
        .create_async()
        .await;

    let grades = client(&server).get_course_grade(&course()).await.unwrap();

    assert!(grades.is_none());
}

#[tokio::test]
async fn lists_calendar_events_in_window() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/calendar_events")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start_date".into(), "2024-09-01".into()),
            Matcher::UrlEncoded("end_date".into(), "2024-09-22".into()),
            Matcher::UrlEncoded("context_codes[]".into(), "user_77".into()),
            Matcher::UrlEncoded("context_codes[]".into(), "course_42".into()),
        ]))
        .with_body(
            json!([{
                "id": 9,
                "title": "Midterm review",
                "start_at": "2024-09-10T18:00:00Z",
                "end_at": "2024-09-10T19:00:00Z",
                "location_name": "Room 101",
                "context_code": "course_42"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let query = CalendarEventQuery::starting("2024-09-01".parse().unwrap())
        .with_user(&User::new(UserId::new(77), None))
        .with_courses([&course()]);
    let events = client(&server).list_calendar_events(&query).await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title(), "Midterm review");
    assert_eq!(events[0].location_name(), Some("Room 101"));
    mock.assert_async().await;
}

#[tokio::test]
async fn gets_the_current_user() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/users/self")
        .match_header("authorization", "Bearer test-token")
        .with_body(
            json!({"id": 77, "name": "Sam Student", "sortable_name": "Student, Sam"}).to_string(),
        )
        .create_async()
        .await;

    let user = client(&server).get_current_user().await.unwrap();

    assert_eq!(user.id(), UserId::new(77));
    assert_eq!(user.name(), Some("Sam Student"));
    mock.assert_async().await;
}

#[tokio::test]
async fn one_session_serves_every_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/courses/42/assignment_groups")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer test-token")
        .with_body("[]")
        .expect(3)
        .create_async()
        .await;

    let canvas = client(&server);
    for _ in 0..3 {
        assert!(canvas.list_assignment_groups(&course()).await.unwrap().is_empty());
    }

    mock.assert_async().await;
}
