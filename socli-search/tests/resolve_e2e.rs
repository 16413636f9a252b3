use socli_common::Provider;
use socli_http::{HttpClient, UserAgentPool};
use socli_search::{
    Endpoints, QuestionLoader, RetryPolicy, SearchError, SearchResolver, Selectors,
    SiteQuestionLoader,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"
<html><body>
  <div class="question-summary">
    <h3><a href="/questions/7/seven">Q: Seven   things</a></h3>
    <div class="excerpt">about seven</div>
    <a class="post-tag" href="/tags/rust">rust</a>
  </div>
  <div class="question-summary">
    <h3><a href="/questions/8/eight">Eight</a></h3>
    <div class="excerpt">about eight</div>
  </div>
</body></html>"#;

const QUESTION: &str = r#"
<html><body>
  <h1><a class="question-hyperlink" href="/questions/7/seven">Seven things</a></h1>
  <div class="js-vote-count">3</div>
  <div class="module question-stats">asked yesterday</div>
  <div class="s-prose js-post-body">What are the seven things?</div>
  <div class="s-prose js-post-body">See <a href="https://example.com/7">the list</a>.</div>
</body></html>"#;

fn parts(server: &MockServer) -> (Arc<HttpClient>, UserAgentPool, Arc<Selectors>) {
    let client = HttpClient::new(&server.uri()).unwrap().with_retries(0);
    (
        Arc::new(client),
        UserAgentPool::builtin(),
        Arc::new(Selectors::compile().unwrap()),
    )
}

#[tokio::test]
async fn native_search_then_question_load() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "seven things"))
        .and(header("accept-language", "en-US"))
        .and(header("accept", "text/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/questions/7/seven"))
        .respond_with(ResponseTemplate::new(200).set_body_string(QUESTION))
        .expect(1)
        .mount(&server)
        .await;

    let (client, pool, selectors) = parts(&server);
    let resolver = SearchResolver::new(client.clone(), pool.clone(), selectors.clone())
        .with_endpoints(Endpoints::on_origin(&server.uri()));

    let list = resolver
        .resolve(Provider::StackOverflow, "seven things", 10)
        .await
        .unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.records[0].title, "Seven things");
    assert_eq!(list.records[0].tags, vec!["rust"]);

    let url = list.content_url(0).unwrap();
    assert_eq!(url, format!("{}/questions/7/seven", server.uri()));

    let view = SiteQuestionLoader::new(client, pool, selectors)
        .load(&url)
        .await
        .unwrap();
    assert_eq!(view.title, "Seven things");
    assert_eq!(view.stats, "Votes 3 | asked yesterday");
    assert_eq!(view.answers, vec!["See the list [https://example.com/7]."]);
}

#[tokio::test]
async fn engine_search_sends_site_filter() {
    let server = MockServer::start().await;
    let body = r#"
        <div class="g">
          <h3>Seven things - Stack Overflow</h3>
          <a href="/url?q=https://stackoverflow.com/questions/7/seven&amp;sa=U&amp;ved=1">x</a>
          <div class="VwiC3b">about seven</div>
        </div>"#;
    Mock::given(method("GET"))
        .and(path("/engine/search"))
        .and(query_param("q", "site:www.stackoverflow.com seven"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let (client, pool, selectors) = parts(&server);
    let list = SearchResolver::new(client, pool, selectors)
        .with_endpoints(Endpoints::on_origin(&server.uri()))
        .resolve(Provider::Google, "seven", 10)
        .await
        .unwrap();
    assert_eq!(list.records[0].title, "Seven things");
    assert_eq!(
        list.content_url(0).as_deref(),
        Some("https://stackoverflow.com/questions/7/seven")
    );
}

#[tokio::test]
async fn empty_listing_is_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .expect(3)
        .mount(&server)
        .await;

    let (client, pool, selectors) = parts(&server);
    let err = SearchResolver::new(client, pool, selectors)
        .with_endpoints(Endpoints::on_origin(&server.uri()))
        .with_policy(RetryPolicy::new(3, Duration::from_millis(5)))
        .resolve(Provider::StackOverflow, "nothing", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::NoResults));
}
