use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Route {
    Html(String),
    Status(u16),
    Redirect(String),
    /// Answers the n-th hit with the n-th route; the last one repeats.
    Sequence(Vec<Route>),
    /// Waits before answering.
    Slow(Duration, Box<Route>),
}

/// Local shop serving fixed pages keyed by request path (including the query).
pub struct SiteStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SiteStub {
    pub fn spawn(routes: Vec<(&str, Route)>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start site stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let routes = Arc::new(
            routes
                .into_iter()
                .map(|(path, route)| (path.to_owned(), route))
                .collect::<HashMap<_, _>>(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request.url().to_string();
                let hit = {
                    let mut seen = seen.lock().expect("lock request log");
                    seen.push(path.clone());
                    seen.iter().filter(|earlier| **earlier == path).count() - 1
                };

                let routes = Arc::clone(&routes);
                thread::spawn(move || {
                    let response = match routes.get(&path) {
                        Some(route) => respond(route, hit),
                        None => tiny_http::Response::from_string("not found").with_status_code(404),
                    };
                    let _ = request.respond(response);
                });
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Paths requested so far, in arrival order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock request log").clone()
    }

    #[allow(dead_code)]
    pub fn hits(&self, path: &str) -> usize {
        self.requests().iter().filter(|seen| *seen == path).count()
    }
}

impl Drop for SiteStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn respond(route: &Route, hit: usize) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    match route {
        Route::Html(body) => tiny_http::Response::from_string(body.clone())
            .with_header(header("Content-Type", "text/html; charset=utf-8")),
        Route::Status(status) => {
            tiny_http::Response::from_string("error").with_status_code(*status)
        }
        Route::Redirect(location) => tiny_http::Response::from_string("")
            .with_status_code(302)
            .with_header(header("Location", location)),
        Route::Sequence(routes) => match routes.get(hit).or(routes.last()) {
            Some(route) => respond(route, hit),
            None => tiny_http::Response::from_string("empty sequence").with_status_code(500),
        },
        Route::Slow(delay, route) => {
            thread::sleep(*delay);
            respond(route, hit)
        }
    }
}

fn header(name: &str, value: &str) -> tiny_http::Header {
    tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("build header")
}

pub fn listing_page(products: &[(&str, &str, &str)]) -> String {
    let wrappers = products
        .iter()
        .map(|(name, price, link)| {
            format!(
                r#"<div class="product_wrapper">
  <a class="product-name" href="{link}">{name}</a>
  <div class="product_prices"><span class="price">{price}</span></div>
</div>
"#
            )
        })
        .collect::<String>();
    format!(
        "<!doctype html>\n<html><head><title>Coins</title></head><body>\n{wrappers}</body></html>\n"
    )
}

pub fn detail_page(labels: &[&str], values: &[&str]) -> String {
    let labels = labels
        .iter()
        .map(|label| format!("<tr><td><span>{label}</span><span>:</span></td></tr>"))
        .collect::<String>();
    let values = values
        .iter()
        .map(|value| format!(r#"<div class="n54117_item_b_sub">{value}</div>"#))
        .collect::<String>();
    format!(
        r#"<!doctype html>
<html><head><title>Product</title></head><body>
<table class="n54117_dictionary">{labels}</table>
<div class="n54117_items">{values}</div>
</body></html>
"#
    )
}
