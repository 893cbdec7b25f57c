pub mod routes;

pub use routes::RouteDao;
