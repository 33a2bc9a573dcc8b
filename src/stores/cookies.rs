use reqwest::Url;
use reqwest::cookie::Jar;

use crate::sampler::CookieStore;

impl CookieStore for Jar {
    fn add_cookie_from_header(&self, header: &str, url: &Url) {
        self.add_cookie_str(header, url);
    }
}
