
#[cfg(test)]
mod client_tests {
    use super::test_utils::shared::*;
    use brewcli::{Brewery, BreweryError, Coordinate, SearchQuery};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_random_maps_to_brewery() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/random", BREWERIES_PATH)))
            .and(query_param("size", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([osgood_brewing()])))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let raw = client.get_random(1).await.expect("get_random failed");
        assert_eq!(raw.len(), 1);

        let brewery = Brewery::from_fields(&raw[0]).expect("mapping failed");
        assert_eq!(brewery.name, "Osgood Brewing");
        assert_eq!(brewery.address.city, "Grandville");
        assert_eq!(
            brewery.website_url.as_deref(),
            Some("http://www.osgoodbrewing.com")
        );
        assert_eq!(
            brewery.address.coordinate,
            Some(Coordinate::new(42.90907804, -85.76493039).unwrap())
        );
    }

    #[tokio::test]
    async fn test_requests_carry_client_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/random", BREWERIES_PATH)))
            .and(header("user-agent", TEST_USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let raw = client.get_random(2).await.expect("get_random failed");
        assert!(raw.is_empty());

        let requests = server.received_requests().await.unwrap();
        let accept = requests[0]
            .headers
            .get("accept")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(accept.starts_with("application/json"), "accept was {:?}", accept);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!(
                "{}/b54b16e1-ac3b-4bff-a11f-f7ae9ddc27e0",
                BREWERIES_PATH
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(madtree_brewing()))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let brewery = client
            .brewery_by_id("b54b16e1-ac3b-4bff-a11f-f7ae9ddc27e0")
            .await
            .expect("brewery_by_id failed");
        assert_eq!(brewery.name, "MadTree Brewing 2.0");
        assert_eq!(brewery.brewery_type, "regional");
        assert_eq!(brewery.address.state, "Ohio");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/missing", BREWERIES_PATH)))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Couldn't find Brewery"})),
            )
            .mount(&server)
            .await;

        let client = setup_client(&server);
        match client.get_by_id("missing").await {
            Err(BreweryError::Transport { url, status }) => {
                assert_eq!(status, 404);
                assert_eq!(url, format!("{}{}/missing", server.uri(), BREWERIES_PATH));
            }
            other => panic!("expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/random", BREWERIES_PATH)))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let err = client.get_random(1).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        match err {
            BreweryError::Transport { url, .. } => assert!(url.ends_with("/random?size=1")),
            other => panic!("expected Transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/random", BREWERIES_PATH)))
            .respond_with(ResponseTemplate::new(200).set_body_string("Not a JSON response"))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        match client.get_random(1).await {
            Err(BreweryError::Parse { url, .. }) => {
                assert_eq!(
                    url,
                    format!("{}{}/random?size=1", server.uri(), BREWERIES_PATH)
                );
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(BREWERIES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let err = client.search(&SearchQuery::new()).await.unwrap_err();
        assert!(matches!(err, BreweryError::Parse { .. }), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_search_sends_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(BREWERIES_PATH))
            .and(query_param("by_city", "Grand Rapids"))
            .and(query_param("by_ids", "123,456"))
            .and(query_param("by_dist", "42.96,-85.66"))
            .and(query_param("by_type", "brewpub"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([osgood_brewing()])))
            .expect(1)
            .mount(&server)
            .await;

        let query = SearchQuery::builder()
            .city("Grand Rapids")
            .ids(["123", "456"])
            .coord(Coordinate::new(42.96, -85.66).unwrap())
            .brewery_type("brewpub")
            .build()
            .unwrap();

        let client = setup_client(&server);
        let breweries = client
            .search_breweries(&query)
            .await
            .expect("search_breweries failed");
        assert_eq!(breweries.len(), 1);
        assert_eq!(breweries[0].address.city, "Grandville");
    }

    #[tokio::test]
    async fn test_mapping_error_propagates_from_convenience_methods() {
        let server = MockServer::start().await;
        let mut incomplete = osgood_brewing();
        incomplete.as_object_mut().unwrap().remove("phone");
        Mock::given(method("GET"))
            .and(path(format!("{}/random", BREWERIES_PATH)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([madtree_brewing(), incomplete])),
            )
            .mount(&server)
            .await;

        let client = setup_client(&server);
        match client.random_breweries(2).await {
            Err(BreweryError::MissingField(field)) => assert_eq!(field, "phone"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_random_keeps_records_with_null_contact_fields() {
        let server = MockServer::start().await;
        let mut sparse = osgood_brewing();
        for key in ["address_1", "street", "phone", "website_url"] {
            sparse[key] = serde_json::Value::Null;
        }
        Mock::given(method("GET"))
            .and(path(format!("{}/random", BREWERIES_PATH)))
            .and(query_param("size", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([madtree_brewing(), sparse])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let breweries = client
            .random_breweries(2)
            .await
            .expect("random_breweries failed");
        assert_eq!(breweries.len(), 2);
        assert_eq!(breweries[1].name, "Osgood Brewing");
        assert_eq!(breweries[1].phone, None);
        assert_eq!(breweries[1].website_url, None);
        assert_eq!(breweries[1].address.street, None);
    }

    #[tokio::test]
    async fn test_connection_failure_is_request_error() {
        // Grab a free port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = brewcli::ClientConfig::default()
            .with_base_url(format!("http://{}{}", addr, BREWERIES_PATH));
        let client = brewcli::BreweryClient::new(&config).unwrap();

        let err = client.get_random(1).await.unwrap_err();
        assert!(matches!(err, BreweryError::Request(_)), "got {:?}", err);
        assert_eq!(err.status(), None);
    }
}
