//! Tests for compact and expanded difficulty conversions.
