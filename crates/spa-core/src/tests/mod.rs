/*! Test coverage for the knowledge base as a whole.
 *
 * Per-store behaviour is tested next to each store. These tests build complete programs through
 * the testing builder and check the facade, lifecycle, and the derived Affects relation.
 */

mod affects_tests;
