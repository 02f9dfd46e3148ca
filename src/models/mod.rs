mod article;
mod page_key;

pub use article::Article;
pub use page_key::PageKey;
