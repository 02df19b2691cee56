// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Chunk Size Value Object
//!
//! This module provides a type-safe representation of chunk sizes used
//! throughout the adaptive pipeline system. It ensures chunk sizes are within
//! valid bounds and provides convenient methods for working with chunk sizes.
//!
//! ## Overview
//!
//! The chunk size value object provides:
//!
//! - **Validation**: Ensures chunk sizes are within acceptable bounds
//! - **Type Safety**: Prevents invalid chunk sizes at compile time
//! - **Convenience Methods**: Easy creation and manipulation of chunk sizes
//! - **Serialization**: JSON and binary serialization support
//! - **Performance**: Optimized for frequent use in processing pipelines
//!
//! ## Design Principles
//!
//! The chunk size follows Domain-Driven Design value object principles:
//!
//! - **Immutability**: Once created, chunk sizes cannot be modified
//! - **Validation**: All chunk sizes are validated at creation time
//! - **Equality**: Two chunk sizes are equal if they have the same byte count
//! - **Value Semantics**: Chunk sizes are compared by value, not identity
//!
//! ## Chunk Size Constraints
//!
//! ### Minimum Size (1 byte)
//! - **Purpose**: Ensures chunks contain at least some data
//! - **Rationale**: Zero-byte chunks would be meaningless in processing
//! - **Impact**: Prevents degenerate cases in processing algorithms
//!
//! ### Maximum Size (512MB)
//! - **Purpose**: Prevents memory exhaustion and performance issues
//! - **Rationale**: Very large chunks can cause memory pressure
//! - **Impact**: Ensures predictable memory usage patterns
//!
//! ### Default Size (1MB)
//! - **Purpose**: Provides a balanced default for most use cases
//! - **Rationale**: Good balance between memory usage and processing efficiency
//! - **Impact**: Optimal performance for typical file processing scenarios
//!
//! ## Usage Examples
//!
//! ### Basic Chunk Size Creation
//!
//! ```
//! use adaptive_pipeline_domain::value_objects::ChunkSize;
//!
//! // Create from bytes
//! let chunk = ChunkSize::new(1024 * 1024).unwrap(); // 1MB
//! assert_eq!(chunk.bytes(), 1024 * 1024);
//!
//! // Create from kilobytes
//! let chunk_kb = ChunkSize::from_kb(512).unwrap(); // 512KB
//! assert_eq!(chunk_kb.bytes(), 512 * 1024);
//!
//! // Create from megabytes
//! let chunk_mb = ChunkSize::from_mb(16).unwrap(); // 16MB
//! assert_eq!(chunk_mb.megabytes(), 16.0);
//!
//! // Use default (1MB)
//! let default_chunk = ChunkSize::default();
//! assert_eq!(default_chunk.bytes(), 1024 * 1024);
//! ```
//!
//! ### Chunk Size Validation
//!
//! ```
//! use adaptive_pipeline_domain::value_objects::ChunkSize;
//!
//! // Valid chunk sizes
//! let valid = ChunkSize::new(64 * 1024).unwrap(); // 64KB - valid
//! assert_eq!(valid.bytes(), 64 * 1024);
//!
//! // Invalid: too small
//! let too_small = ChunkSize::new(0); // Must be at least 1 byte
//! assert!(too_small.is_err());
//!
//! // Invalid: too large
//! let too_large = ChunkSize::new(600 * 1024 * 1024); // Max is 512MB
//! assert!(too_large.is_err());
//!
//! // Optimal sizing for file
//! let optimal = ChunkSize::optimal_for_file_size(100 * 1024 * 1024); // 100MB file
//! assert!(optimal.bytes() >= ChunkSize::MIN_SIZE);
//! assert!(optimal.bytes() <= ChunkSize::MAX_SIZE);
//! ```
//!
//! ### Chunk Size Arithmetic
//!
//! ```
//! use adaptive_pipeline_domain::value_objects::ChunkSize;
//!
//! let chunk = ChunkSize::from_mb(2).unwrap(); // 2MB chunk
//!
//! // Calculate chunks needed for a file
//! let file_size = 10 * 1024 * 1024; // 10MB file
//! let chunks_needed = chunk.chunks_needed_for_file(file_size);
//! assert_eq!(chunks_needed, 5); // 10MB / 2MB = 5 chunks
//!
//! // Check if optimal for file size
//! let is_optimal = chunk.is_optimal_for_file(file_size);
//! println!("Chunk is optimal: {}", is_optimal);
//!
//! // Display formatting
//! assert_eq!(format!("{}", chunk), "2.0MB");
//! ```
//!
//! ## Performance Considerations
//!
//! ### Memory Usage
//!
//! - **Small Chunks**: Lower memory usage but higher processing overhead
//! - **Large Chunks**: Higher memory usage but lower processing overhead
//! - **Optimal Range**: 64KB to 4MB for most applications
//!
//! ### Processing Efficiency
//!
//! - **I/O Operations**: Larger chunks reduce I/O overhead
//! - **CPU Processing**: Moderate chunks balance CPU cache efficiency
//! - **Parallelism**: Smaller chunks enable better parallel processing
//!
//! ### Adaptive Sizing
//!
//! The chunk size can be dynamically adjusted based on:
//! - **File Size**: Larger files may benefit from larger chunks
//! - **Available Memory**: Adjust chunk size based on system resources
//! - **Processing Type**: Different algorithms may prefer different chunk sizes
//! - **Network Conditions**: Streaming scenarios may require smaller chunks
//!
//! ## Integration
//!
//! The chunk size value object integrates with:
//!
//! - **File Processing**: Determines how files are divided for processing
//! - **Memory Management**: Influences memory allocation patterns
//! - **Performance Tuning**: Enables performance optimization strategies
//! - **Configuration**: Allows runtime configuration of chunk sizes
//!
//! ## Thread Safety
//!
//! The chunk size value object is fully thread-safe:
//!
//! - **Immutable**: Once created, chunk sizes cannot be modified
//! - **Copy Semantics**: Cheap to copy and pass between threads
//! - **No Shared State**: No mutable shared state to synchronize
//!
//! ## Future Enhancements
//!
//! Planned enhancements include:
//!
//! - **Adaptive Sizing**: Automatic chunk size optimization
//! - **Profile-Based Sizing**: Chunk size profiles for different use cases
//! - **Dynamic Adjustment**: Runtime chunk size adjustment based on performance
//! - **Compression-Aware Sizing**: Chunk sizes optimized for compression
//!   algorithms

use crate::ArchiveError;
use serde::{Deserialize, Serialize};

/// Value object representing a chunk size with validation
///
/// This struct provides a type-safe representation of chunk sizes used
/// throughout the adaptive pipeline system. It ensures chunk sizes are within
/// valid bounds and provides convenient methods for working with chunk sizes.
///
/// # Key Features
///
/// - **Validation**: Ensures chunk sizes are within acceptable bounds (1 byte
///   to 512MB)
/// - **Type Safety**: Prevents invalid chunk sizes at compile time
/// - **Immutability**: Once created, chunk sizes cannot be modified
/// - **Serialization**: Full JSON and binary serialization support
/// - **Performance**: Optimized for frequent use in processing pipelines
///
/// # Constraints
///
/// - **Minimum Size**: 1 byte (prevents degenerate cases)
/// - **Maximum Size**: 512MB (prevents memory exhaustion)
/// - **Default Size**: 1MB (balanced for most use cases)
///
/// # Examples
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkSize {
    bytes: usize,
}

impl ChunkSize {
    /// Minimum chunk size (1 byte) - must be at least 1 byte for processing
    pub const MIN_SIZE: usize = 1;

    /// Maximum chunk size (512MB) - prevents memory exhaustion
    pub const MAX_SIZE: usize = 512 * 1024 * 1024;

    /// Default chunk size (1MB)
    pub const DEFAULT_SIZE: usize = 1024 * 1024;

    /// Creates a new chunk size with validation
    ///
    /// Validates that the specified size is within acceptable bounds before
    /// creating the chunk size instance.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Size in bytes (must be between 1 byte and 512MB)
    ///
    /// # Returns
    ///
    /// * `Ok(ChunkSize)` - Valid chunk size
    /// * `Err(ArchiveError::InvalidConfiguration)` - If size is out of bounds
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Size is less than `MIN_SIZE` (1 byte)
    /// - Size exceeds `MAX_SIZE` (512MB)
    ///
    /// # Examples
    pub fn new(bytes: usize) -> Result<Self, ArchiveError> {
        if bytes < Self::MIN_SIZE {
            return Err(ArchiveError::InvalidConfiguration(format!(
                "Chunk size {} is below minimum of {} bytes",
                bytes,
                Self::MIN_SIZE
            )));
        }

        if bytes > Self::MAX_SIZE {
            return Err(ArchiveError::InvalidConfiguration(format!(
                "Chunk size {} exceeds maximum of {} bytes",
                bytes,
                Self::MAX_SIZE
            )));
        }

        Ok(ChunkSize { bytes })
    }

    /// Creates a chunk size from kilobytes
    ///
    /// Convenience method for creating chunk sizes in KB units.
    ///
    /// # Arguments
    ///
    /// * `kb` - Size in kilobytes
    ///
    /// # Returns
    ///
    /// * `Ok(ChunkSize)` - Valid chunk size
    /// * `Err(ArchiveError)` - If resulting size is out of bounds
    ///
    /// # Examples
    pub fn from_kb(kb: usize) -> Result<Self, ArchiveError> {
        Self::new(kb * 1024)
    }

    /// Creates a chunk size from megabytes
    ///
    /// Convenience method for creating chunk sizes in MB units.
    ///
    /// # Arguments
    ///
    /// * `mb` - Size in megabytes
    ///
    /// # Returns
    ///
    /// * `Ok(ChunkSize)` - Valid chunk size
    /// * `Err(ArchiveError)` - If resulting size is out of bounds
    ///
    /// # Examples
    pub fn from_mb(mb: usize) -> Result<Self, ArchiveError> {
        Self::new(mb * 1024 * 1024)
    }

    /// Gets the chunk size in bytes
    ///
    /// # Returns
    ///
    /// The size in bytes as a `usize`
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Gets the size in bytes (alias for test framework compatibility)
    pub fn as_bytes(&self) -> usize {
        self.bytes
    }

    /// Gets the size in kilobytes
    pub fn kilobytes(&self) -> f64 {
        (self.bytes as f64) / 1024.0
    }

    /// Gets the size in megabytes
    pub fn megabytes(&self) -> f64 {
        (self.bytes as f64) / (1024.0 * 1024.0)
    }

    /// Calculates the optimal chunk size based on file size
    ///
    /// This method implements an empirically-optimized strategy based on
    /// comprehensive benchmark results across file sizes from 5MB to 2GB.
    ///
    /// # Empirical Optimization Results
    /// - **100MB files**: 16MB chunks optimal (vs 2MB adaptive = +43.7%
    ///   performance)
    /// - **500MB files**: 16MB chunks optimal (vs 4MB adaptive = +56.2%
    ///   performance)
    /// - **2GB files**: 128MB chunks optimal (current algorithm validated)
    /// - **Small files**: Current algorithm performing reasonably well
    pub fn optimal_for_file_size(file_size: u64) -> Self {
        let optimal_size = match file_size {
            // Small files: use smaller chunks (current algorithm validated)
            0..=1_048_576 => 64 * 1024,           // 64KB for files <= 1MB
            1_048_577..=10_485_760 => 256 * 1024, // 256KB for files <= 10MB

            // Medium files: Empirically optimized for 16MB chunks
            // Benchmark results show 16MB chunks significantly outperform smaller chunks
            10_485_761..=52_428_800 => 2 * 1024 * 1024, // 2MB for files <= 50MB
            52_428_801..=524_288_000 => 16 * 1024 * 1024, // 16MB for files 50MB-500MB (optimized)

            // Large files: Moderate chunk sizes to balance throughput and memory
            524_288_001..=2_147_483_648 => 64 * 1024 * 1024, // 64MB for files 500MB-2GB

            // Huge files: Very large chunks for maximum throughput (validated)
            _ => 128 * 1024 * 1024, // 128MB for huge files (>2GB) - empirically validated
        };

        // Ensure the calculated size is within bounds
        let clamped_size = optimal_size.clamp(Self::MIN_SIZE, Self::MAX_SIZE);
        ChunkSize { bytes: clamped_size }
    }

    /// Calculates the number of chunks needed for a given file size
    pub fn chunks_needed_for_file(&self, file_size: u64) -> u64 {
        if file_size == 0 {
            return 0;
        }
        file_size.div_ceil(self.bytes as u64)
    }

    /// Checks if this chunk size is optimal for the given file size
    pub fn is_optimal_for_file(&self, file_size: u64) -> bool {
        let optimal = Self::optimal_for_file_size(file_size);
        self.bytes == optimal.bytes
    }

    /// Adjusts the chunk size based on available memory
    pub fn adjust_for_memory(
        &self,
        available_memory: usize,
        max_parallel_chunks: usize,
    ) -> Result<Self, ArchiveError> {
        let max_chunk_size = available_memory / max_parallel_chunks.max(1);
        let adjusted_size = self.bytes.min(max_chunk_size).max(Self::MIN_SIZE);
        Self::new(adjusted_size)
    }

    /// Validates user-provided chunk size input with sanity checks
    /// Returns validated chunk size in bytes or error message
    pub fn validate_user_input(user_chunk_size_mb: usize, file_size: u64) -> Result<usize, String> {
        // Convert MB to bytes
        let user_chunk_size_bytes = user_chunk_size_mb * 1024 * 1024;

        // Basic range validation
        if user_chunk_size_bytes < Self::MIN_SIZE {
            return Err(format!(
                "Chunk size {} MB is too small. Minimum is {} bytes",
                user_chunk_size_mb,
                Self::MIN_SIZE
            ));
        }

        if user_chunk_size_bytes > Self::MAX_SIZE {
            return Err(format!(
                "Chunk size {} MB exceeds maximum of {} MB",
                user_chunk_size_mb,
                Self::MAX_SIZE / (1024 * 1024)
            ));
        }

        // Efficiency warnings for very small files
        if file_size > 0 && user_chunk_size_bytes > (file_size as usize) {
            return Err(format!(
                "Chunk size {} MB is larger than file size ({} bytes). Consider smaller chunk size",
                user_chunk_size_mb, file_size
            ));
        }

        // Warning for very large chunks on small files
        if file_size < 10_485_760 && user_chunk_size_mb > 10 {
            // File < 10MB, chunk > 10MB
            return Err(format!(
                "Chunk size {} MB is excessive for small file ({} bytes). Consider 1-10 MB",
                user_chunk_size_mb, file_size
            ));
        }

        Ok(user_chunk_size_bytes)
    }

    /// Returns a description of the chunk size strategy for the given file size
    pub fn strategy_description(file_size: u64) -> &'static str {
        match file_size {
            0..=1_048_576 => "Small chunks (tiny files)",
            1_048_577..=10_485_760 => "Medium chunks (small files)",
            10_485_761..=104_857_600 => "Balanced chunks (medium files)",
            104_857_601..=1_073_741_824 => "Large chunks (large files)",
            _ => "Very large chunks (huge files)",
        }
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        ChunkSize {
            bytes: Self::DEFAULT_SIZE,
        }
    }
}

impl std::fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bytes >= 1024 * 1024 {
            write!(f, "{:.1}MB", self.megabytes())
        } else if self.bytes >= 1024 {
            write!(f, "{:.1}KB", self.kilobytes())
        } else {
            write!(f, "{}B", self.bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    // Unit tests for ChunkSize value object.
    //
    // Tests cover creation, validation, conversion utilities, and serialization.

    use super::*;
    use serde_json;

    /// Tests ChunkSize creation with valid input values.
    ///
    /// Validates that:
    /// - Minimum valid size (1 byte) is accepted
    /// - Common sizes (KB, MB) are handled correctly
    /// - Maximum valid size (512MB) is accepted
    /// - Size values are stored and retrieved accurately
    #[test]
    fn test_chunk_size_creation_valid_cases() {
        // Test minimum valid size
        let min_size = ChunkSize::new(1).unwrap();
        assert_eq!(min_size.bytes(), 1);

        // Test common valid sizes
        let kb_size = ChunkSize::new(1024).unwrap();
        assert_eq!(kb_size.bytes(), 1024);

        let mb_size = ChunkSize::new(1024 * 1024).unwrap();
        assert_eq!(mb_size.bytes(), 1024 * 1024);

        // Test maximum valid size (512MB)
        let max_size = ChunkSize::new(512 * 1024 * 1024).unwrap();
        assert_eq!(max_size.bytes(), 512 * 1024 * 1024);
    }

    /// Tests ChunkSize creation with invalid input values.
    ///
    /// Validates that:
    /// - Zero size is rejected with appropriate error
    /// - Sizes above maximum (513MB+) are rejected
    /// - Error messages are descriptive and helpful
    /// - Boundary conditions are properly handled
    #[test]
    fn test_chunk_size_creation_invalid_cases() {
        // Test zero size (invalid)
        assert!(ChunkSize::new(0).is_err());

        // Test above maximum (513MB - invalid)
        assert!(ChunkSize::new(513 * 1024 * 1024).is_err());

        // Test way above maximum
        assert!(ChunkSize::new(usize::MAX).is_err());
    }

    /// Tests ChunkSize creation from kilobyte values.
    ///
    /// Validates that:
    /// - Valid KB values are converted correctly to bytes
    /// - KB to bytes conversion is accurate (1 KB = 1024 bytes)
    /// - Invalid KB values (0, too large) are rejected
    /// - Kilobytes accessor returns correct values
    #[test]
    fn test_chunk_size_from_kb() {
        // Valid KB sizes
        let size_1kb = ChunkSize::from_kb(1).unwrap();
        assert_eq!(size_1kb.bytes(), 1024);
        assert_eq!(size_1kb.kilobytes(), 1.0);

        let size_512kb = ChunkSize::from_kb(512).unwrap();
        assert_eq!(size_512kb.bytes(), 512 * 1024);
        assert_eq!(size_512kb.kilobytes(), 512.0);

        // Invalid KB sizes
        assert!(ChunkSize::from_kb(0).is_err()); // 0 KB
        assert!(ChunkSize::from_kb(512 * 1024 + 1).is_err()); // > 512MB
    }

    /// Tests ChunkSize creation from megabyte values.
    ///
    /// Validates that:
    /// - Valid MB values are converted correctly to bytes
    /// - MB to bytes conversion is accurate (1 MB = 1024*1024 bytes)
    /// - Maximum valid size (512MB) is handled correctly
    /// - Invalid MB values (0, too large) are rejected
    /// - Megabytes accessor returns correct values
    #[test]
    fn test_chunk_size_from_mb() {
        // Valid MB sizes
        let size_1mb = ChunkSize::from_mb(1).unwrap();
        assert_eq!(size_1mb.bytes(), 1024 * 1024);
        assert_eq!(size_1mb.megabytes(), 1.0);

        let size_64mb = ChunkSize::from_mb(64).unwrap();
        assert_eq!(size_64mb.bytes(), 64 * 1024 * 1024);
        assert_eq!(size_64mb.megabytes(), 64.0);

        // Maximum valid size (512MB)
        let size_512mb = ChunkSize::from_mb(512).unwrap();
        assert_eq!(size_512mb.bytes(), 512 * 1024 * 1024);
        assert_eq!(size_512mb.megabytes(), 512.0);

        // Invalid MB sizes
        assert!(ChunkSize::from_mb(0).is_err()); // 0 MB
        assert!(ChunkSize::from_mb(513).is_err()); // > 512MB
    }

    /// Tests ChunkSize unit conversion methods.
    ///
    /// Validates that:
    /// - Bytes accessor returns exact byte count
    /// - Kilobytes conversion is accurate (bytes / 1024)
    /// - Megabytes conversion is accurate (bytes / 1024^2)
    /// - Floating point precision is handled correctly
    #[test]
    fn test_chunk_size_conversions() {
        let size = ChunkSize::new(2 * 1024 * 1024 + 512 * 1024).unwrap(); // 2.5MB

        // Test byte conversion
        assert_eq!(size.bytes(), 2 * 1024 * 1024 + 512 * 1024);

        // Test KB conversion (should be 2560.0)
        assert!((size.kilobytes() - 2560.0).abs() < f64::EPSILON);

        // Test MB conversion (should be 2.5)
        assert!((size.megabytes() - 2.5).abs() < f64::EPSILON);
    }

    /// Tests optimal chunk size algorithm for different file sizes.
    ///
    /// Validates that:
    /// - Small files (< 1MB) use 64KB chunks for efficiency
    /// - Medium files (1MB - 100MB) scale chunk size appropriately
    /// - Large files use optimal chunk sizes for performance
    /// - Algorithm respects minimum and maximum chunk size limits
    #[test]
    fn test_optimal_chunk_size_algorithm() {
        // Test very small files (< 1MB) - should use 64KB
        let tiny_file = ChunkSize::optimal_for_file_size(500_000); // 500KB
        assert_eq!(tiny_file.bytes(), 64 * 1024);

        let small_file = ChunkSize::optimal_for_file_size(800_000); // 800KB
        assert_eq!(small_file.bytes(), 64 * 1024);

        // Test medium files (1MB - 100MB) - should scale appropriately
        let medium_file = ChunkSize::optimal_for_file_size(50 * 1024 * 1024); // 50MB
        assert!(medium_file.bytes() >= 64 * 1024); // At least 64KB
        assert!(medium_file.bytes() <= 64 * 1024 * 1024); // At most 64MB

        // Test large files (> 100MB) - should use 64MB
        let large_file = ChunkSize::optimal_for_file_size(2_000_000_000); // 2GB
        assert_eq!(large_file.bytes(), 64 * 1024 * 1024);

        // Test edge case: zero file size
        let empty_file = ChunkSize::optimal_for_file_size(0);
        assert_eq!(empty_file.bytes(), 64 * 1024); // Default to 64KB
    }

    /// Tests calculation of chunks needed for given file sizes.
    ///
    /// Validates that:
    /// - Zero file size requires zero chunks
    /// - Exact divisions calculate correctly
    /// - Partial chunks round up appropriately
    /// - Different chunk sizes work correctly
    /// - Edge cases are handled properly
    #[test]
    fn test_chunks_needed_calculation() {
        let chunk_size_1mb = ChunkSize::from_mb(1).unwrap();

        // Test exact divisions
        assert_eq!(chunk_size_1mb.chunks_needed_for_file(0), 0);
        assert_eq!(chunk_size_1mb.chunks_needed_for_file(1024 * 1024), 1); // Exactly 1MB
        assert_eq!(chunk_size_1mb.chunks_needed_for_file(2 * 1024 * 1024), 2); // Exactly 2MB

        // Test partial chunks (should round up)
        assert_eq!(chunk_size_1mb.chunks_needed_for_file(500_000), 1); // 0.5MB -> 1 chunk
        assert_eq!(chunk_size_1mb.chunks_needed_for_file(1_500_000), 2); // 1.5MB -> 2 chunks
        assert_eq!(chunk_size_1mb.chunks_needed_for_file(2_500_000), 3); // 2.5MB -> 3 chunks

        // Test with different chunk sizes
        let chunk_size_64kb = ChunkSize::from_kb(64).unwrap();
        assert_eq!(chunk_size_64kb.chunks_needed_for_file(128 * 1024), 2); // 128KB / 64KB = 2
        assert_eq!(chunk_size_64kb.chunks_needed_for_file(100 * 1024), 2); // 100KB / 64KB = 1.56 -> 2
    }

    /// Tests Display trait implementation for ChunkSize.
    ///
    /// Validates that:
    /// - Byte values (< 1KB) display as "XB"
    /// - Kilobyte values display as "XKB" with appropriate precision
    /// - Megabyte values display as "XMB" with appropriate precision
    /// - Formatting is human-readable and consistent
    #[test]
    fn test_chunk_size_display_formatting() {
        // Test byte display (< 1KB)
        let bytes_size = ChunkSize::new(512).unwrap();
        assert_eq!(format!("{}", bytes_size), "512B");

        // Test KB display (1KB - 1MB)
        let kb_size = ChunkSize::from_kb(256).unwrap();
        assert_eq!(format!("{}", kb_size), "256.0KB");

        // Test MB display (>= 1MB)
        let mb_size = ChunkSize::from_mb(64).unwrap();
        assert_eq!(format!("{}", mb_size), "64.0MB");

        // Test fractional displays
        let fractional_kb = ChunkSize::new(1536).unwrap(); // 1.5KB
        assert_eq!(format!("{}", fractional_kb), "1.5KB");

        let fractional_mb = ChunkSize::new(1024 * 1024 + 512 * 1024).unwrap(); // 1.5MB
        assert_eq!(format!("{}", fractional_mb), "1.5MB");
    }

    /// Tests JSON serialization and deserialization of ChunkSize.
    ///
    /// Validates that:
    /// - ChunkSize can be serialized to JSON
    /// - Deserialized ChunkSize maintains original values
    /// - Serialization roundtrip preserves data integrity
    /// - JSON format is compatible with external systems
    #[test]
    fn test_chunk_size_serialization() {
        let original = ChunkSize::from_mb(32).unwrap();

        // Test JSON serialization
        let json = serde_json::to_string(&original).unwrap();
        let deserialized: ChunkSize = serde_json::from_str(&json).unwrap();

        assert_eq!(original.bytes(), deserialized.bytes());
        assert_eq!(original.megabytes(), deserialized.megabytes());
    }

    /// Tests equality and ordering implementations for ChunkSize.
    ///
    /// Validates that:
    /// - Equal chunk sizes compare as equal
    /// - Different chunk sizes compare correctly
    /// - Ordering follows byte count values
    /// - Hash values are consistent for equal instances
    #[test]
    fn test_chunk_size_equality_and_ordering() {
        let size1 = ChunkSize::from_kb(64).unwrap();
        let size2 = ChunkSize::from_kb(64).unwrap();
        let size3 = ChunkSize::from_kb(128).unwrap();

        // Test equality
        assert_eq!(size1, size2);
        assert_ne!(size1, size3);

        // Test ordering
        assert!(size1 < size3);
        assert!(size3 > size1);
        assert!(size1 <= size2);
        assert!(size2 >= size1);
    }

    /// Tests hash consistency for ChunkSize objects in HashMap usage.
    ///
    /// Validates that:
    /// - Equal ChunkSize objects produce identical hash values
    /// - Hash values are consistent across multiple calls
    /// - HashMap operations work correctly with ChunkSize keys
    /// - Hash implementation supports collection usage
    /// - Hash distribution is reasonable for performance
    #[test]
    fn test_chunk_size_hash_consistency() {
        use std::collections::HashMap;
        use std::path::{Path, PathBuf};

        let size1 = ChunkSize::from_mb(16).unwrap();
        let size2 = ChunkSize::from_mb(16).unwrap();

        let mut map = HashMap::new();
        map.insert(size1, "test_value");

        // Should be able to retrieve with equivalent ChunkSize
        assert_eq!(map.get(&size2), Some(&"test_value"));
    }

    /// Tests ChunkSize handling of edge cases and boundary conditions.
    ///
    /// Validates that:
    /// - Minimum size (1 byte) is handled correctly
    /// - Maximum size (512MB) is handled correctly
    /// - Unit conversions work at boundary values
    /// - Fractional calculations are accurate
    /// - Edge cases don't cause precision issues
    #[test]
    fn test_chunk_size_edge_cases() {
        // Test minimum size (1 byte)
        let min_size = ChunkSize::new(1).unwrap();
        assert_eq!(min_size.kilobytes(), 1.0 / 1024.0);
        assert_eq!(min_size.megabytes(), 1.0 / (1024.0 * 1024.0));

        // Test maximum size (512MB)
        let max_size = ChunkSize::new(512 * 1024 * 1024).unwrap();
        assert_eq!(max_size.megabytes(), 512.0);
        assert_eq!(max_size.kilobytes(), 512.0 * 1024.0);

        // Test chunks needed for very large files
        let small_chunk = ChunkSize::new(1).unwrap();
        assert_eq!(small_chunk.chunks_needed_for_file(1000), 1000);
    }

    /// Tests chunk size behavior at exact unit boundaries (KB, MB).
    ///
    /// This test validates that chunk size calculations are accurate at exact
    /// unit boundaries and that display formatting works correctly for boundary
    /// values.
    ///
    /// # Test Coverage
    ///
    /// - Exact KB boundary (1024 bytes) calculations and display
    /// - Exact MB boundary (1024*1024 bytes) calculations and display
    /// - Just-under-boundary values display correctly
    /// - Unit conversion accuracy at boundaries
    /// - Display formatting consistency
    ///
    /// # Assertions
    ///
    /// - Exactly 1KB shows as "1.0KB" with precise calculations
    /// - Exactly 1MB shows as "1.0MB" with precise calculations
    /// - Values just under boundaries use appropriate units
    /// - Fractional calculations maintain precision
    /// - Display formatting follows unit selection rules
    #[test]
    fn test_chunk_size_boundary_conditions() {
        // Test exactly at KB boundary
        let exactly_1kb = ChunkSize::new(1024).unwrap();
        assert_eq!(exactly_1kb.kilobytes(), 1.0);
        assert_eq!(format!("{}", exactly_1kb), "1.0KB");

        // Test exactly at MB boundary
        let exactly_1mb = ChunkSize::new(1024 * 1024).unwrap();
        assert_eq!(exactly_1mb.megabytes(), 1.0);
        assert_eq!(format!("{}", exactly_1mb), "1.0MB");

        // Test just under boundaries
        let under_1kb = ChunkSize::new(1023).unwrap();
        assert_eq!(format!("{}", under_1kb), "1023B");

        let under_1mb = ChunkSize::new(1024 * 1024 - 1).unwrap();
        assert!(format!("{}", under_1mb).contains("KB"));
    }

    /// Tests performance characteristics of optimal chunk size calculations.
    ///
    /// This test validates that the optimal chunk size algorithm produces
    /// reasonable results for various file sizes and that the resulting
    /// chunk counts are sensible for parallel processing.
    ///
    /// # Test Coverage
    ///
    /// - Optimal chunk size calculation for various file sizes
    /// - Chunk size bounds validation (1KB minimum, 64MB maximum)
    /// - Reasonable chunk count generation for parallel processing
    /// - Performance scaling across different file sizes
    /// - Sanity checks for chunk calculations
    ///
    /// # Test Scenarios
    ///
    /// - Small files (1KB): Minimal but reasonable chunk sizes
    /// - Medium files (1MB-10MB): Balanced chunk sizes for efficiency
    /// - Large files (100MB-1GB): Optimal chunk sizes for parallelism
    /// - Chunk count validation: Positive and reasonable numbers
    /// - Performance bounds: Within acceptable limits
    ///
    /// # Assertions
    ///
    /// - Optimal chunk sizes are at least 1KB (minimum efficiency)
    /// - Optimal chunk sizes are at most 64MB (memory constraints)
    /// - Chunk counts are positive and reasonable
    /// - Algorithm scales appropriately with file size
    /// - Results are consistent and deterministic
    #[test]
    fn test_chunk_size_performance_characteristics() {
        // Test that optimal chunk size makes sense for different file sizes
        let sizes = vec![
            1024,               // 1KB
            1024 * 1024,        // 1MB
            10 * 1024 * 1024,   // 10MB
            100 * 1024 * 1024,  // 100MB
            1024 * 1024 * 1024, // 1GB
        ];

        for file_size in sizes {
            let optimal = ChunkSize::optimal_for_file_size(file_size);

            // Optimal chunk size should be reasonable
            assert!(optimal.bytes() >= 1024); // At least 1KB
            assert!(optimal.bytes() <= 64 * 1024 * 1024); // At most 64MB

            // Should result in reasonable number of chunks
            let chunks = optimal.chunks_needed_for_file(file_size);
            assert!(chunks > 0);
            assert!(chunks <= file_size); // Sanity check
        }
    }
}
