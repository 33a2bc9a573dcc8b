use reqwest::cookie::{CookieStore as _, Jar};
use reqwest::header::{ETAG, HeaderMap, HeaderValue, LAST_MODIFIED};
use reqwest::{StatusCode, Url};

use super::redirect::next_method;
use super::{CacheEntry, MemoryCache};
use crate::sampler::{CacheStore, CookieStore, ResponseAdapter, SampleResult};

fn url(raw: &str) -> Result<Url, String> {
    Url::parse(raw).map_err(|err| format!("bad test url {}: {}", raw, err))
}

fn validator_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(LAST_MODIFIED, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
    headers.insert(ETAG, HeaderValue::from_static("\"v1\""));
    headers
}

#[test]
fn cache_records_successful_get() -> Result<(), String> {
    let target = url("http://localhost/item")?;
    let headers = validator_headers();
    let cache = MemoryCache::new();
    let result = SampleResult::started(&target, "GET");

    cache.save_details(&ResponseAdapter::new(StatusCode::OK, &headers, &target), &result);

    let expected = CacheEntry {
        last_modified: Some("Wed, 21 Oct 2015 07:28:00 GMT".to_owned()),
        etag: Some("\"v1\"".to_owned()),
        expires: None,
        cache_control: None,
    };
    if cache.get("http://localhost/item") != Some(expected) {
        return Err(format!("Unexpected entry {:?}", cache.get("http://localhost/item")));
    }
    Ok(())
}

#[test]
fn cache_ignores_other_methods_and_statuses() -> Result<(), String> {
    let target = url("http://localhost/item")?;
    let headers = validator_headers();
    let cache = MemoryCache::new();

    let post = SampleResult::started(&target, "POST");
    cache.save_details(&ResponseAdapter::new(StatusCode::OK, &headers, &target), &post);
    let get = SampleResult::started(&target, "GET");
    cache.save_details(
        &ResponseAdapter::new(StatusCode::NOT_FOUND, &headers, &target),
        &get,
    );

    if !cache.is_empty() {
        return Err(format!("Expected empty cache, got {} entries", cache.len()));
    }
    Ok(())
}

#[test]
fn jar_accepts_cookies_from_headers() -> Result<(), String> {
    let target = url("http://localhost/login")?;
    let jar = Jar::default();

    CookieStore::add_cookie_from_header(&jar, "a=1", &target);
    CookieStore::add_cookie_from_header(&jar, "b=2; Path=/", &target);

    let sent = jar
        .cookies(&url("http://localhost/")?)
        .ok_or("Expected cookies for the host")?;
    let sent = sent.to_str().map_err(|err| err.to_string())?;
    if !sent.contains("b=2") {
        return Err(format!("Unexpected cookie header {}", sent));
    }
    let scoped = jar
        .cookies(&target)
        .ok_or("Expected cookies for the login path")?;
    let scoped = scoped.to_str().map_err(|err| err.to_string())?;
    if !(scoped.contains("a=1") && scoped.contains("b=2")) {
        return Err(format!("Unexpected cookie header {}", scoped));
    }
    Ok(())
}

#[test]
fn redirect_method_rewrites() -> Result<(), String> {
    let cases = [
        ("POST", Some(303), "GET"),
        ("PUT", Some(303), "GET"),
        ("HEAD", Some(303), "HEAD"),
        ("POST", Some(301), "GET"),
        ("POST", Some(302), "GET"),
        ("PUT", Some(302), "PUT"),
        ("POST", Some(307), "POST"),
        ("DELETE", Some(308), "DELETE"),
        ("GET", None, "GET"),
    ];
    for (method, status, expected) in cases {
        let next = next_method(method, status);
        if next != expected {
            return Err(format!(
                "{} after {:?} should become {}, got {}",
                method, status, expected, next
            ));
        }
    }
    Ok(())
}
