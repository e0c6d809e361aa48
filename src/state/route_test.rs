use super::*;

#[test]
fn parse_known_paths() {
    assert_eq!(Route::parse("/"), Some(Route::Board(None)));
    assert_eq!(Route::parse(""), Some(Route::Board(None)));
    assert_eq!(Route::parse("/login"), Some(Route::Login));
    assert_eq!(Route::parse("/signup/"), Some(Route::Signup));
    assert_eq!(Route::parse("/board/b-1"), Some(Route::Board(Some("b-1".into()))));
}

#[test]
fn parse_rejects_unknown_paths() {
    assert_eq!(Route::parse("/board/"), None);
    assert_eq!(Route::parse("/board/a/b"), None);
    assert_eq!(Route::parse("/settings"), None);
}

#[test]
fn path_round_trips_through_parse() {
    for route in [Route::Login, Route::Signup, Route::Board(None), Route::Board(Some("b-7".into()))] {
        assert_eq!(Route::parse(&route.path()), Some(route));
    }
}

#[test]
fn guard_redirects_signed_out_visitors_from_boards() {
    assert_eq!(guard(Route::Board(None), false), Route::Login);
    assert_eq!(guard(Route::Board(Some("b-1".into())), false), Route::Login);
}

#[test]
fn guard_lets_signed_in_visitors_through() {
    let route = Route::Board(Some("b-1".into()));
    assert_eq!(guard(route.clone(), true), route);
}

#[test]
fn guard_never_blocks_login_or_signup() {
    assert_eq!(guard(Route::Login, false), Route::Login);
    assert_eq!(guard(Route::Signup, false), Route::Signup);
    assert_eq!(guard(Route::Signup, true), Route::Signup);
}
