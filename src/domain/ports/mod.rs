mod catalog_port;
mod http_transport_port;
mod image_fetch_port;

pub use catalog_port::CatalogPort;
pub use http_transport_port::{DEFAULT_TIMEOUT, HttpRequest, HttpResponse, HttpTransport};
pub use image_fetch_port::{ImageCallback, ImageFetchPort, ImageRequest, ImageResult};
