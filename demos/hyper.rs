use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fixroute::{Capture, Node};
use hyper::body::Incoming;
use hyper::server::conn::http1::Builder as ConnectionBuilder;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tower::service_fn;
use tower::util::BoxCloneService;
use tower::Service as _;
use tracing_subscriber::EnvFilter;

use self::body::Body;

// The captured `{id}` of a `/users/{id}` request, handed to the handler
// through the request extensions.
#[derive(Clone, Debug)]
struct UserId(String);

// GET /
async fn index(_req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("Hello, world!")))
}

// GET /blog
async fn blog(_req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("...")))
}

// GET /users/{id}
async fn user(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let id = req
        .extensions()
        .get::<UserId>()
        .map(|UserId(id)| id.as_str())
        .unwrap_or_default();

    Ok(Response::new(Body::from(format!("user {id}").as_str())))
}

// 404 handler
async fn not_found(_req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    Ok(Response::builder().status(404).body(Body::empty()).unwrap())
}

// We can use `BoxCloneService` to erase the type of each handler service.
//
// We still need a `Mutex` around each service because `BoxCloneService` doesn't
// require the service to implement `Sync`.
type Service = Mutex<BoxCloneService<Request<Incoming>, Response<Body>, hyper::Error>>;

// Each router lives in slots leaked for the lifetime of the server.
type MethodRouter = fixroute::Router<'static, 'static, Service>;

// We use a `HashMap` to hold a `Router` for each HTTP method. This allows us
// to register the same route for multiple methods.
type Router = HashMap<Method, MethodRouter>;

fn method_router(slots: usize) -> MethodRouter {
    let slots: Vec<Node<'static, Service>> =
        std::iter::repeat_with(Node::default).take(slots).collect();
    fixroute::Router::new(slots.leak())
}

async fn route(router: Arc<Router>, mut req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    // find the subrouter for this request method
    let router = match router.get(req.method()) {
        Some(router) => router,
        // if there are no routes for this method, respond with 405 Method Not Allowed
        None => return Ok(Response::builder().status(405).body(Body::empty()).unwrap()),
    };

    // find the service for this request path, copying out what we need before
    // the request is handed over
    let mut captures = [Capture::default(); 4];
    let found = match router.find(req.uri().path(), &mut captures) {
        Ok(found) => {
            // lock the service for a very short time, just to clone the service
            let service = found.value.lock().unwrap().clone();
            let id = found.get("id").map(|id| UserId(id.to_owned()));
            Some((service, id))
        }
        Err(_) => None,
    };

    match found {
        Some((mut service, id)) => {
            if let Some(id) = id {
                req.extensions_mut().insert(id);
            }
            service.call(req).await
        }
        // if we there is no matching service, call the 404 handler
        None => {
            tracing::debug!(path = req.uri().path(), "no route");
            not_found(req).await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Create a router and register our routes.
    let mut get = method_router(32);

    // GET / => `index`
    get.insert("/", BoxCloneService::new(service_fn(index)).into())
        .unwrap();

    // GET /blog => `blog`
    get.insert("/blog", BoxCloneService::new(service_fn(blog)).into())
        .unwrap();

    // GET /users/{id} => `user`
    let remaining = get
        .insert("/users/{id}", BoxCloneService::new(service_fn(user)).into())
        .unwrap();
    tracing::info!(routes = get.len(), remaining, "routes registered");

    let mut router = Router::new();
    router.insert(Method::GET, get);

    let listener = TcpListener::bind(("127.0.0.1", 3000)).await.unwrap();
    tracing::info!("listening on http://127.0.0.1:3000");

    // boilerplate for the hyper service
    let router = Arc::new(router);

    loop {
        let router = router.clone();
        let (tcp, _) = listener.accept().await.unwrap();
        tokio::task::spawn(async move {
            if let Err(err) = ConnectionBuilder::new()
                .serve_connection(
                    TokioIo::new(tcp),
                    hyper::service::service_fn(|request| async {
                        route(router.clone(), request).await
                    }),
                )
                .await
            {
                tracing::warn!(error = ?err, "error serving connection");
            }
        });
    }
}

mod body {
    use std::convert::Infallible;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use hyper::body::{Body as HttpBody, Bytes, Frame};

    pub enum Body {
        Empty,
        Once(Option<Bytes>),
    }

    impl HttpBody for Body {
        type Data = Bytes;
        type Error = Infallible;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
            match &mut self.as_mut().get_mut() {
                Self::Empty => Poll::Ready(None),
                Self::Once(val) => Poll::Ready(val.take().map(|bytes| Ok(Frame::data(bytes)))),
            }
        }
    }

    impl Body {
        pub fn empty() -> Self {
            Self::Empty
        }
    }

    impl From<&str> for Body {
        fn from(s: &str) -> Self {
            if s.is_empty() {
                Self::Empty
            } else {
                Self::Once(Some(Bytes::from(s.as_bytes().to_vec())))
            }
        }
    }
}
