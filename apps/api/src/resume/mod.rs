// Resume handling: stored blob encoding, text acquisition and AI field extraction.
// All LLM calls go through llm_client.

pub mod blob;
pub mod extract;
pub mod ingest;
pub mod prompts;
