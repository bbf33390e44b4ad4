#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use weibo_oauth2::{
	_preludet::*,
	api::{ApiRequest, UploadFile},
	auth::TokenSecret,
	error::TransportError,
};

const CLIENT_ID: &str = "K";
const CLIENT_SECRET: &str = "S";

fn redirect() -> Url {
	Url::parse("http://example.com/back").expect("Redirect URI should parse successfully.")
}

#[tokio::test]
async fn identity_chain_runs_against_a_live_mock_provider() {
	let server = MockServer::start_async().await;
	let broker =
		build_reqwest_test_broker(descriptor_for(&server.url("")), CLIENT_ID, CLIENT_SECRET);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/access_token")
				.header("content-type", "application/x-www-form-urlencoded")
				.body(
					"grant_type=authorization_code&code=C&redirect_uri=http%3A%2F%2Fexample.com%2Fback&client_id=K&client_secret=S",
				);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T1\",\"expires_in\":3600,\"remind_in\":\"3600\",\"uid\":\"42\"}");
		})
		.await;
	let uid_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/2/account/get_uid.json").query_param("access_token", "T1");
			then.status(200).header("content-type", "application/json").body("{\"uid\":42}");
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/2/users/show.json")
				.query_param("access_token", "T1")
				.query_param("uid", "42");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":42,\"name\":\"Alice\",\"location\":\"X\"}");
		})
		.await;
	let identity = broker
		.get_authenticated_user(&redirect(), "C", ["gender"])
		.await
		.expect("Identity resolution should not fail.")
		.expect("Identity resolution should produce a record.");

	token_mock.assert_async().await;
	uid_mock.assert_async().await;
	profile_mock.assert_async().await;

	assert_eq!(identity.get("name"), Some(&json!("Alice")));
	assert!(identity.contains_field("gender"));
	assert_eq!(identity.access_token().expose(), "T1");
	assert_eq!(identity.session_expires(), Some(3600));
}

#[tokio::test]
async fn token_endpoint_failures_resolve_to_absence() {
	let server = MockServer::start_async().await;
	let broker =
		build_reqwest_test_broker(descriptor_for(&server.url("")), CLIENT_ID, CLIENT_SECRET);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/access_token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_code\":21325}");
		})
		.await;
	let session = broker
		.exchange_code(&redirect(), "C")
		.await
		.expect("Provider rejections must not escape as errors.");

	token_mock.assert_async().await;

	assert!(session.is_none());
}

#[tokio::test]
async fn api_client_posts_forms_and_surfaces_statuses() {
	let server = MockServer::start_async().await;
	let broker =
		build_reqwest_test_broker(descriptor_for(&server.url("")), CLIENT_ID, CLIENT_SECRET);
	let update_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/2/statuses/update.json")
				.query_param("access_token", "T1")
				.header("content-type", "application/x-www-form-urlencoded")
				.body("status=hello+world");
			then.status(200).header("content-type", "application/json").body("{\"id\":1}");
		})
		.await;
	let busy_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/2/statuses/home_timeline.json");
			then.status(503).body("busy");
		})
		.await;
	let api = broker.api();
	let created = api
		.call(
			ApiRequest::new("/statuses/update")
				.access_token(TokenSecret::new("T1"))
				.post_args([("status", "hello world")]),
		)
		.await
		.expect("Form posts should not fail.");

	update_mock.assert_async().await;

	assert_eq!(created, Some(json!({"id": 1})));

	let timeline = ApiRequest::new("/statuses/home_timeline").access_token(TokenSecret::new("T1"));

	assert_eq!(api.call(timeline.clone()).await.expect("Statuses must be absorbed."), None);

	let err = api.try_call(timeline).await.expect_err("try_call should surface the status.");

	assert!(matches!(err, Error::Transport(TransportError::Status { status: 503 })));

	busy_mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn uploads_reach_the_provider_as_multipart() {
	let server = MockServer::start_async().await;
	let broker =
		build_reqwest_test_broker(descriptor_for(&server.url("")), CLIENT_ID, CLIENT_SECRET);
	let upload_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/2/statuses/upload.json").query_param("access_token", "T1");
			then.status(200).header("content-type", "application/json").body("{\"id\":2}");
		})
		.await;
	let uploaded = broker
		.api()
		.call(
			ApiRequest::new("/statuses/upload")
				.access_token(TokenSecret::new("T1"))
				.post_args([("status", "look")])
				.pic(UploadFile::new("a.png", vec![0x89, b'P', b'N', b'G'])),
		)
		.await
		.expect("Uploads with a picture should not fail.");

	upload_mock.assert_async().await;

	assert_eq!(uploaded, Some(json!({"id": 2})));
}
