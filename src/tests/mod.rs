//! Internal unit tests for json-render.

mod stream_tests;
