/*
 * Responsibility
 * - transport に依存しないロジック (token の発行/検証, column codec)
 * - middleware / handler からはこの層を呼ぶ
 */
pub mod auth;
pub mod json_array;
