// Phishing heuristics: cheap, deterministic rules evaluated before the
// model tier. Every rule runs on every URL so the full flag record is
// available for explaining a verdict.

pub mod phishing;

pub use phishing::{HeuristicFlags, HeuristicRules, PhishingHeuristic};
