use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// 400 days, the longest lifetime browsers accept.
pub const DEFAULT_MAX_AGE_SECS: i64 = 400 * 24 * 60 * 60;

/// Options the auth client attaches to every cookie it writes or removes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub domain: Option<String>,
    pub max_age_secs: i64,
    pub same_site: SameSite,
    pub http_only: bool,
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            same_site: SameSite::Lax,
            http_only: false,
            secure: false,
        }
    }
}

/// Named cookie access for the auth client, backed by whatever cookie storage
/// the current request has.
pub trait CookieMethods {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str, options: &CookieOptions);
    fn remove(&mut self, name: &str, options: &CookieOptions);
}

impl CookieMethods for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        CookieJar::get(self, name).map(|cookie| cookie.value().to_owned())
    }

    fn set(&mut self, name: &str, value: &str, options: &CookieOptions) {
        let cookie = build_cookie(name, value, options);
        let jar = std::mem::replace(self, CookieJar::new());
        *self = jar.add(cookie);
    }

    fn remove(&mut self, name: &str, options: &CookieOptions) {
        let cookie = build_cookie(name, "", options);
        let jar = std::mem::replace(self, CookieJar::new());
        *self = jar.remove(cookie);
    }
}

fn build_cookie(name: &str, value: &str, options: &CookieOptions) -> Cookie<'static> {
    let mut cookie = Cookie::build(name.to_owned(), value.to_owned())
        .path(options.path.clone())
        .same_site(options.same_site)
        .http_only(options.http_only)
        .secure(options.secure)
        .max_age(time::Duration::seconds(options.max_age_secs))
        .finish();
    if let Some(domain) = &options.domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}
