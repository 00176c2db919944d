pub use ntlog_core::format::OutputFormat;
