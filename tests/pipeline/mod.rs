pub mod tests_pipeline;
