//! ユースケース単位のシナリオテスト

mod support;
