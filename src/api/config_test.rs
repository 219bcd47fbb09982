use super::*;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that mutate the process environment.
fn env_guard() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_saybox_env() };
    guard
}

/// # Safety
/// Callers must hold `ENV_LOCK`.
unsafe fn clear_saybox_env() {
    unsafe {
        std::env::remove_var("SAYBOX_BASE_URL");
        std::env::remove_var("SAYBOX_PLATFORM");
        std::env::remove_var("SAYBOX_IOS_BASE_URL");
        std::env::remove_var("SAYBOX_ANDROID_BASE_URL");
        std::env::remove_var("SAYBOX_DEFAULT_BASE_URL");
        std::env::remove_var("SAYBOX_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("SAYBOX_CONNECT_TIMEOUT_SECS");
    }
}

#[test]
fn resolve_uses_platform_key() {
    let endpoints = PlatformEndpoints::default();
    assert_eq!(endpoints.resolve(Platform::Ios), DEFAULT_MOBILE_BASE_URL);
    assert_eq!(endpoints.resolve(Platform::Android), DEFAULT_MOBILE_BASE_URL);
    assert_eq!(endpoints.resolve(Platform::Default), DEFAULT_BASE_URL);
}

#[test]
fn resolve_falls_back_to_default() {
    let endpoints = PlatformEndpoints { ios: None, android: None, default: "http://fallback:1".into() };
    assert_eq!(endpoints.resolve(Platform::Ios), "http://fallback:1");
    assert_eq!(endpoints.resolve(Platform::Android), "http://fallback:1");
}

#[test]
fn endpoint_urls_join_base() {
    let cfg = ExchangeConfig::new("http://localhost:8050/").unwrap();
    assert_eq!(cfg.base_url, "http://localhost:8050");
    assert_eq!(cfg.submit_url(), "http://localhost:8050/api");
    assert_eq!(cfg.comments_url(), "http://localhost:8050/api/comments");
}

#[test]
fn base_url_keeps_path_prefix() {
    let cfg = ExchangeConfig::new("https://example.test/saybox").unwrap();
    assert_eq!(cfg.comments_url(), "https://example.test/saybox/api/comments");
}

#[test]
fn invalid_base_url_errors() {
    let err = ExchangeConfig::new("not a url").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

    let err = ExchangeConfig::new("ftp://example.test").unwrap_err().to_string();
    assert!(err.contains("unsupported scheme"));
}

#[test]
fn from_env_defaults_to_localhost_for_default_platform() {
    let _guard = env_guard();
    unsafe { std::env::set_var("SAYBOX_PLATFORM", "default") };

    let cfg = ExchangeConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.timeouts, Timeouts::default());

    unsafe { clear_saybox_env() };
}

#[test]
fn from_env_selects_mobile_platform_override() {
    let _guard = env_guard();
    unsafe {
        std::env::set_var("SAYBOX_PLATFORM", "android");
        std::env::set_var("SAYBOX_ANDROID_BASE_URL", "http://10.0.2.2:8050/");
        std::env::set_var("SAYBOX_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("SAYBOX_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = ExchangeConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "http://10.0.2.2:8050");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_saybox_env() };
}

#[test]
fn from_env_base_url_wins_over_platform() {
    let _guard = env_guard();
    unsafe {
        std::env::set_var("SAYBOX_PLATFORM", "ios");
        std::env::set_var("SAYBOX_BASE_URL", "http://override:9000");
    }

    let cfg = ExchangeConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "http://override:9000");

    unsafe { clear_saybox_env() };
}

#[test]
fn from_env_unknown_platform_errors() {
    let _guard = env_guard();
    unsafe { std::env::set_var("SAYBOX_PLATFORM", "palmos") };

    let err = ExchangeConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("unknown SAYBOX_PLATFORM"));

    unsafe { clear_saybox_env() };
}

#[test]
fn from_env_ignores_unparseable_timeouts() {
    let _guard = env_guard();
    unsafe {
        std::env::set_var("SAYBOX_PLATFORM", "default");
        std::env::set_var("SAYBOX_REQUEST_TIMEOUT_SECS", "soon");
    }

    let cfg = ExchangeConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

    unsafe { clear_saybox_env() };
}

#[test]
fn from_env_rejects_zero_timeouts() {
    let _guard = env_guard();
    unsafe {
        std::env::set_var("SAYBOX_PLATFORM", "default");
        std::env::set_var("SAYBOX_REQUEST_TIMEOUT_SECS", "0");
        std::env::set_var("SAYBOX_CONNECT_TIMEOUT_SECS", "0");
    }

    let cfg = ExchangeConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts, Timeouts::default());

    unsafe { clear_saybox_env() };
}

#[test]
fn explicit_base_url_skips_platform_selection() {
    let _guard = env_guard();
    unsafe {
        std::env::set_var("SAYBOX_PLATFORM", "palmos");
        std::env::set_var("SAYBOX_BASE_URL", "http://from-env:1");
        std::env::set_var("SAYBOX_CONNECT_TIMEOUT_SECS", "3");
    }

    let cfg = ExchangeConfig::from_env_with_base_url(Some("http://explicit:8050/")).unwrap();
    assert_eq!(cfg.base_url, "http://explicit:8050");
    assert_eq!(cfg.timeouts.connect_secs, 3);

    unsafe { clear_saybox_env() };
}

#[test]
fn explicit_base_url_is_still_validated() {
    let _guard = env_guard();
    let err = ExchangeConfig::from_env_with_base_url(Some("nope")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
}
