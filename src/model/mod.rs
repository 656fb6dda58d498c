// Model tier: trait-based abstraction for swappable URL classifiers.
//
// The UrlModel trait defines the interface: an ordered feature vector goes
// in, a binary label comes out. LinearModel loads logistic-regression
// weights from a JSON artifact; the optional ONNX backend runs an exported
// classifier. The cascade never knows which one it is talking to.

pub mod features;
pub mod linear;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod traits;

pub use features::{extract_features, FeatureVector};
pub use linear::LinearModel;
pub use traits::{FixedModel, Label, UnloadedModel, UrlModel};
