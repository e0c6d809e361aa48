//! Route table and the auth guard in front of the board pages.

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    /// `/` when `None`, `/board/:id` otherwise.
    Board(Option<String>),
}

impl Route {
    /// Match a path against the route table. Unknown paths yield `None`.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Board(None)),
            "/login" => Some(Self::Login),
            "/signup" => Some(Self::Signup),
            _ => {
                let id = trimmed.strip_prefix("/board/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Some(Self::Board(Some(id.to_owned())))
            }
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_owned(),
            Self::Signup => "/signup".to_owned(),
            Self::Board(None) => "/".to_owned(),
            Self::Board(Some(id)) => format!("/board/{id}"),
        }
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Board(_))
    }
}

/// Where a visitor actually lands: protected routes send signed-out
/// visitors to the login page, everything else passes through.
#[must_use]
pub fn guard(route: Route, is_authenticated: bool) -> Route {
    if route.requires_auth() && !is_authenticated { Route::Login } else { route }
}
