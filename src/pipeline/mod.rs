// Batch pipelines built on top of the classifier.

pub mod scan;
