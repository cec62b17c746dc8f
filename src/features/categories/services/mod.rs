mod category_service;

pub(crate) use category_service::CATEGORY_COLUMNS;
pub use category_service::CategoryService;
