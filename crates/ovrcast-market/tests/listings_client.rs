// End-to-end tests for the listings client against a local HTTP server.

use std::time::Duration;

use ovrcast_market::{ListingsClient, MarketError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve canned responses: for each request, pick the body by the `page=`
/// query parameter. Returns the base URL.
async fn serve(pages: Vec<(u32, u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let page = request
                .split("page=")
                .nth(1)
                .and_then(|rest| rest.split(|c: char| !c.is_ascii_digit()).next())
                .and_then(|digits| digits.parse::<u32>().ok())
                .unwrap_or(1);

            let (status, body) = pages
                .iter()
                .find(|(p, _, _)| *p == page)
                .map(|(_, s, b)| (*s, b.clone()))
                .unwrap_or((404, String::from("{}")));

            let response = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}/apis/listings.json?type=mlb_card")
}

fn page_body(total_pages: u32, names: &[(&str, u32)]) -> String {
    let listings: Vec<serde_json::Value> = names
        .iter()
        .map(|(name, ovr)| {
            serde_json::json!({
                "listing_name": name,
                "best_buy_price": "1,000",
                "best_sell_price": 1200,
                "item": { "ovr": ovr }
            })
        })
        .collect();
    serde_json::json!({ "total_pages": total_pages, "listings": listings }).to_string()
}

#[tokio::test]
async fn fetch_all_walks_every_page_in_order() {
    let url = serve(vec![
        (1, 200, page_body(2, &[("Logan Webb", 85), ("Chris Bassitt", 79)])),
        (2, 200, page_body(2, &[("Cedric Mullins", 78)])),
    ])
    .await;

    let client = ListingsClient::new(url, 10, Duration::from_secs(5)).unwrap();
    let cards = client.fetch_all().await.unwrap();

    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Logan Webb", "Chris Bassitt", "Cedric Mullins"]);
    assert_eq!(cards[0].buy_price, Some(1000));
    assert_eq!(cards[0].sell_price, Some(1200));
}

#[tokio::test]
async fn fetch_all_stops_at_max_pages() {
    let url = serve(vec![
        (1, 200, page_body(5, &[("Logan Webb", 85)])),
        (2, 200, page_body(5, &[("Cedric Mullins", 78)])),
    ])
    .await;

    let client = ListingsClient::new(url, 1, Duration::from_secs(5)).unwrap();
    let cards = client.fetch_all().await.unwrap();
    assert_eq!(cards.len(), 1);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let url = serve(vec![(1, 503, String::from("{}"))]).await;

    let client = ListingsClient::new(url, 3, Duration::from_secs(5)).unwrap();
    let err = client.fetch_all().await.unwrap_err();
    match err {
        MarketError::Status { status, .. } => assert_eq!(status, 503),
        other => panic!("expected Status error, got: {other}"),
    }
}
