use super::*;

#[test]
fn user_message_prefers_server_message() {
    let err = ApiError::Status { status: 401, message: Some("Invalid credentials!".into()) };
    assert_eq!(err.user_message("Login failed"), "Invalid credentials!");
}

#[test]
fn user_message_falls_back_without_server_message() {
    let err = ApiError::Status { status: 500, message: None };
    assert_eq!(err.user_message("Failed to fetch boards"), "Failed to fetch boards");
}

#[test]
fn user_message_ignores_blank_server_message() {
    let err = ApiError::Status { status: 400, message: Some("   ".into()) };
    assert_eq!(err.user_message("Signup failed"), "Signup failed");
}

#[test]
fn user_message_falls_back_for_transport_errors() {
    let err = ApiError::Transport("connection refused".into());
    assert_eq!(err.user_message("Failed to delete task"), "Failed to delete task");
    assert_eq!(err.status(), None);
}

#[test]
fn status_reports_http_code() {
    let err = ApiError::Status { status: 404, message: Some("Board not found!".into()) };
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "server returned status 404");
}
