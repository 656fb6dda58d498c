// URL discovery: finding URLs in free text and reducing them to the
// normalized form used as the identity key everywhere else.

pub mod extractor;
pub mod normalize;

pub use extractor::extract_urls;
pub use normalize::{host_of, normalize};
