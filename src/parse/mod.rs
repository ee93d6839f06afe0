pub mod frontmatter_parser;
pub mod frontmatter_serializer;

pub use frontmatter_parser::{body, header_span, parse_frontmatter};
pub use frontmatter_serializer::{FrontmatterError, render_header, serialize_frontmatter};
