mod support;

mod openai_client_tests;
mod translation_tests;
