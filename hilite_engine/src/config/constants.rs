pub mod compile_time {
    pub mod lexical {
        /// Maximum source size accepted by the pipeline façade (10MB)
        /// SECURITY: Prevents DoS via oversized payloads
        pub const MAX_SOURCE_SIZE: usize = 10 * 1024 * 1024;

        /// Buffer size for lexical metrics collection
        /// RESOURCE: Controls memory allocation for metrics
        pub const METRICS_BUFFER_SIZE: usize = 1000;
    }

    pub mod syntax {
        /// Maximum parser recursion depth to prevent stack overflow
        /// SECURITY: Prevents DoS attacks via deeply nested structures
        pub const MAX_PARSE_DEPTH: usize = 100;

        /// Maximum tokens to examine during error recovery
        /// PERFORMANCE: Limits recovery scanning overhead
        pub const MAX_RECOVERY_SCAN_TOKENS: usize = 1000;

        /// Token lookahead limit for parsing decisions
        /// PERFORMANCE: Controls lookahead memory usage
        pub const MAX_LOOKAHEAD_TOKENS: usize = 10;
    }

    pub mod pipeline {
        /// Minimum source length the façade accepts (caller contract)
        pub const MIN_SOURCE_LENGTH: usize = 10;
    }

    pub mod logging {
        /// Log buffer size for batch operations
        /// RESOURCE: Controls memory usage for logging
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
