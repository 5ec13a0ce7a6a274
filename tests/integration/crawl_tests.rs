//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the structured API and the search
//! engine, and run full searches through `UnifiedCrawler` with pacing disabled.

use candidate_sourcer::config::{Config, PacingEntry};
use candidate_sourcer::crawler::{AuthenticatedSearchClient, ProfileSource};
use candidate_sourcer::{CrawlError, SearchCriteria, UnifiedCrawler};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PATH: &str = "/voyager/api/search/dash/clusters";
const PROFILE_TYPE: &str = "com.linkedin.voyager.dash.identity.profile.Profile";

/// Creates a test configuration pointing every endpoint at the mock server
fn create_test_config(server: &MockServer, session_cookie: Option<&str>) -> Config {
    let mut config = Config::default();
    config.linkedin.api_base_url = server.uri();
    config.linkedin.session_cookie = session_cookie.map(str::to_string);
    config.search_engine.search_url = format!("{}/search", server.uri());
    config.pacing.authenticated = PacingEntry::immediate();
    config.pacing.fallback = PacingEntry::immediate();
    config
}

fn boston_criteria() -> SearchCriteria {
    SearchCriteria {
        keywords: vec!["python".into(), "backend".into()],
        titles: vec!["Backend Engineer".into()],
        locations: vec!["Boston".into()],
        ..Default::default()
    }
}

fn search_response(people: &[(&str, &str, &str)]) -> Value {
    let included: Vec<Value> = people
        .iter()
        .map(|(first, last, id)| {
            json!({
                "$type": PROFILE_TYPE,
                "firstName": first,
                "lastName": last,
                "publicIdentifier": id,
                "occupation": "Backend Engineer at Acme",
                "locationName": "Boston, MA"
            })
        })
        .collect();
    json!({ "data": {}, "included": included })
}

fn result_page(ids: &[&str]) -> String {
    let mut html = String::from("<html><body>");
    for id in ids {
        html.push_str(&format!(
            r#"<div class="g"><a href="/url?q=https://www.linkedin.com/in/{}&amp;sa=U">Dev {} - Backend Engineer - Acme | LinkedIn</a></div>"#,
            id, id
        ));
    }
    html.push_str(r#"<div><a href="https://www.linkedin.com/company/acme">Acme</a></div>"#);
    html.push_str("</body></html>");
    html
}

async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/feed/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("JSESSIONID=\"{}\"; Path=/", token).as_str()),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_authenticated_search_recovers_from_rate_limit() {
    let server = MockServer::start().await;
    mount_token(&server, "ajax:1").await;

    // First search call is throttled
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&[
            ("Ada", "Lovelace", "ada-lovelace"),
            ("Grace", "Hopper", "grace-hopper"),
            ("Alan", "Turing", "alan-turing"),
        ])))
        .mount(&server)
        .await;

    let config = create_test_config(&server, Some("session"));
    let crawler = UnifiedCrawler::new(&config).expect("Failed to build crawler");
    let result = crawler.search(&boston_criteria(), 10).await.unwrap();

    assert_eq!(result.profiles.len(), 3);
    assert_eq!(result.queries_used.len(), 2);
    assert_eq!(result.profiles[0].name, "Ada Lovelace");
    assert_eq!(
        result.profiles[0].profile_url,
        "https://www.linkedin.com/in/ada-lovelace"
    );
    assert_eq!(result.profiles[0].current_title.as_deref(), Some("Backend Engineer"));
    assert_eq!(result.profiles[0].current_company.as_deref(), Some("Acme"));
    assert_eq!(result.profiles[0].location.as_deref(), Some("Boston, MA"));
}

#[tokio::test]
async fn test_token_harvest_and_csrf_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed/"))
        .and(header("cookie", "li_at=session"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=\"ajax:777\"; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Only requests carrying the harvested token get results
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(header("csrf-token", "ajax:777"))
        .and(header("x-li-lang", "en_US"))
        .and(query_param("q", "all"))
        .and(query_param("start", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_response(&[("Ada", "Lovelace", "ada-lovelace")])),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server, Some("session"));
    let crawler = UnifiedCrawler::new(&config).unwrap();
    let result = crawler.search(&boston_criteria(), 5).await.unwrap();

    // Both queries return the same person; the duplicate is dropped
    assert_eq!(result.profiles.len(), 1);
    assert_eq!(result.profiles[0].public_id(), Some("ada-lovelace"));
}

#[tokio::test]
async fn test_rejected_token_is_harvested_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=\"ajax:1\"; Path=/"),
        )
        // Every rejected query drops the token, so each of the 4 queries harvests one
        .expect(4)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = create_test_config(&server, Some("session"));
    let client = AuthenticatedSearchClient::new(&config, "session").unwrap();

    let first = client.search_people(&boston_criteria(), 10).await;
    assert!(matches!(first, Err(CrawlError::Unauthorized(_))));

    let second = client.search_people(&boston_criteria(), 10).await;
    assert!(matches!(second, Err(CrawlError::Unauthorized(_))));
}

#[tokio::test]
async fn test_authenticated_server_error_keeps_later_results() {
    let server = MockServer::start().await;
    mount_token(&server, "ajax:1").await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_response(&[
            ("Ada", "Lovelace", "ada-lovelace"),
            ("Grace", "Hopper", "grace-hopper"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // The partial result is kept, so the search engine is never consulted
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&["jane-doe"])))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, Some("session"));
    let result = UnifiedCrawler::new(&config)
        .unwrap()
        .search(&boston_criteria(), 10)
        .await
        .unwrap();

    assert_eq!(result.profiles.len(), 2);
    assert_eq!(result.profiles[0].public_id(), Some("ada-lovelace"));
    assert_eq!(result.profiles[1].public_id(), Some("grace-hopper"));
}

#[tokio::test]
async fn test_authenticated_timeout_keeps_later_results() {
    let server = MockServer::start().await;
    mount_token(&server, "ajax:1").await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_response(&[("Ada", "Lovelace", "ada-lovelace")])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&["jane-doe"])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, Some("session"));
    config.http.request_timeout_ms = 200;
    let result = UnifiedCrawler::new(&config)
        .unwrap()
        .search(&boston_criteria(), 10)
        .await
        .unwrap();

    assert_eq!(result.profiles.len(), 1);
    assert_eq!(result.profiles[0].public_id(), Some("ada-lovelace"));
}

#[tokio::test]
async fn test_fallback_server_error_keeps_later_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(result_page(&["jane-doe", "john-roe"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, None);
    let result = UnifiedCrawler::new(&config)
        .unwrap()
        .search(&boston_criteria(), 10)
        .await
        .unwrap();

    assert_eq!(result.profiles.len(), 2);
    assert_eq!(result.profiles[0].name, "Dev jane-doe");
}

#[tokio::test]
async fn test_fallback_timeout_keeps_later_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(result_page(&["slow-one"]))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&["john-roe"])))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, None);
    config.http.request_timeout_ms = 200;
    let result = UnifiedCrawler::new(&config)
        .unwrap()
        .search(&boston_criteria(), 10)
        .await
        .unwrap();

    let urls: Vec<&str> = result
        .profiles
        .iter()
        .map(|p| p.profile_url.as_str())
        .collect();
    assert_eq!(urls, vec!["https://www.linkedin.com/in/john-roe"]);
}

#[tokio::test]
async fn test_rejected_credential_falls_back_to_search_engine() {
    let server = MockServer::start().await;
    mount_token(&server, "ajax:1").await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&["jane-doe"])))
        .mount(&server)
        .await;

    let config = create_test_config(&server, Some("session"));
    let result = UnifiedCrawler::new(&config)
        .unwrap()
        .search(&boston_criteria(), 10)
        .await
        .unwrap();

    assert_eq!(result.profiles.len(), 1);
    assert_eq!(result.profiles[0].name, "Dev jane-doe");
}

#[tokio::test]
async fn test_empty_authenticated_results_fall_back() {
    let server = MockServer::start().await;
    mount_token(&server, "ajax:1").await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"included": []})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&["a-one", "b-two"])))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server, Some("session"));
    let result = UnifiedCrawler::new(&config)
        .unwrap()
        .search(&boston_criteria(), 10)
        .await
        .unwrap();

    assert_eq!(result.profiles.len(), 2);
    assert_eq!(
        result.queries_used,
        vec!["Backend Engineer python backend", "python backend Boston"]
    );
}

#[tokio::test]
async fn test_fallback_end_to_end_without_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param(
            "q",
            "site:linkedin.com/in \"Backend Engineer python backend\"",
        ))
        .and(query_param("num", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(result_page(&["jane-doe", "john-roe"])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "site:linkedin.com/in \"python backend Boston\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(result_page(&["john-roe", "mary-major"])),
        )
        .mount(&server)
        .await;

    // Nothing may hit the structured API without a credential
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, None);
    let crawler = UnifiedCrawler::new(&config).unwrap();
    assert!(!crawler.has_authenticated());

    let result = crawler.search(&boston_criteria(), 10).await.unwrap();

    assert_eq!(
        result.queries_used,
        vec!["Backend Engineer python backend", "python backend Boston"]
    );
    let urls: Vec<&str> = result
        .profiles
        .iter()
        .map(|p| p.profile_url.as_str())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://www.linkedin.com/in/jane-doe",
            "https://www.linkedin.com/in/john-roe",
            "https://www.linkedin.com/in/mary-major",
        ]
    );
    assert_eq!(result.profiles[0].headline.as_deref(), Some("Backend Engineer"));
}

#[tokio::test]
async fn test_fallback_respects_max_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(result_page(&["a", "b", "c", "d"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, None);
    let result = UnifiedCrawler::new(&config)
        .unwrap()
        .search(&boston_criteria(), 3)
        .await
        .unwrap();

    assert_eq!(result.profiles.len(), 3);
    assert_eq!(result.queries_used.len(), 2);
}

#[tokio::test]
async fn test_enrich_profile() {
    let server = MockServer::start().await;
    mount_token(&server, "ajax:1").await;

    let body = json!({
        "data": {},
        "included": [
            {
                "$type": "com.linkedin.voyager.identity.profile.Profile",
                "entityUrn": "urn:li:fs_profile:ACoAAA1",
                "publicIdentifier": "ada-lovelace",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "headline": "Analyst",
                "locationName": "London",
                "summary": "First programmer."
            },
            {
                "$type": "com.linkedin.voyager.identity.profile.Position",
                "entityUrn": "urn:li:fs_position:(ACoAAA1,100)",
                "title": "Engineer",
                "companyName": "Analytical Engines",
                "timePeriod": {"startDate": {"year": 2019}}
            },
            {
                "$type": "com.linkedin.voyager.identity.profile.Position",
                "entityUrn": "urn:li:fs_position:(ACoAAA1,99)",
                "title": "Translator",
                "companyName": "Royal Society",
                "timePeriod": {"startDate": {"year": 2015}, "endDate": {"year": 2019}}
            },
            {
                "$type": "com.linkedin.voyager.identity.profile.Education",
                "entityUrn": "urn:li:fs_education:(ACoAAA1,7)",
                "schoolName": "Home Tutoring",
                "fieldOfStudy": "Mathematics"
            },
            {
                "$type": "com.linkedin.voyager.identity.profile.Skill",
                "entityUrn": "urn:li:fs_skill:(ACoAAA1,1)",
                "name": "Mathematics"
            },
            {
                "$type": "com.linkedin.voyager.common.Company",
                "name": "Analytical Engines"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/voyager/api/identity/profiles/ada-lovelace"))
        .and(header("csrf-token", "ajax:1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let config = create_test_config(&server, Some("session"));
    let crawler = UnifiedCrawler::new(&config).unwrap();
    let profile = crawler
        .enrich_profile("ada-lovelace")
        .await
        .expect("profile should be enriched");

    assert_eq!(profile.name, "Ada Lovelace");
    assert_eq!(profile.profile_url, "https://www.linkedin.com/in/ada-lovelace");
    assert_eq!(profile.current_title.as_deref(), Some("Engineer"));
    assert_eq!(profile.current_company.as_deref(), Some("Analytical Engines"));
    assert_eq!(profile.headline.as_deref(), Some("Analyst"));
    assert_eq!(profile.summary.as_deref(), Some("First programmer."));
    assert_eq!(profile.experience.len(), 2);
    assert_eq!(profile.experience[0].duration.as_deref(), Some("2019 - Present"));
    assert_eq!(profile.experience[1].duration.as_deref(), Some("2015 - 2019"));
    assert_eq!(profile.education[0].school, "Home Tutoring");
    assert_eq!(profile.skills, vec!["Mathematics"]);
}

#[tokio::test]
async fn test_enrich_failure_is_absent() {
    let server = MockServer::start().await;
    mount_token(&server, "ajax:1").await;

    Mock::given(method("GET"))
        .and(path("/voyager/api/identity/profiles/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(&server, Some("session"));
    let crawler = UnifiedCrawler::new(&config).unwrap();
    assert!(crawler.enrich_profile("ghost").await.is_none());

    let without_cookie = UnifiedCrawler::new(&create_test_config(&server, None)).unwrap();
    assert!(without_cookie.enrich_profile("ada-lovelace").await.is_none());
}
