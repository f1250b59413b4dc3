pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

pub fn scrape() -> LogCtx<ops::scrape::Scrape> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn extract() -> LogCtx<ops::extract::Extract> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn search() -> LogCtx<ops::search::Search> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn sources() -> LogCtx<ops::sources::Sources> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
