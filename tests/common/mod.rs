//! Shared test fixtures for the integration suites.
//!
//! Worked-example hosts (signs, hoppers, banners, item stacks, chests), their
//! keys, and a registry binding them.
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

pub use facet_data::prelude::*;
pub use facet_data::{ElementCollection, ProviderError, RegistryBuilder, ValueCache};
use once_cell::sync::Lazy;
use std::sync::Once;

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

// ============================================================================
// Keys
// ============================================================================

pub static SIGN_LINES: Lazy<Key<Vec<String>>> =
    Lazy::new(|| Key::list(KeyId::from_static("demo:sign_lines")));
pub static GLOWING: Lazy<Key<bool>> = Lazy::new(|| Key::plain(KeyId::from_static("demo:glowing")));
pub static COOLDOWN: Lazy<Key<i32>> =
    Lazy::new(|| Key::bounded(KeyId::from_static("demo:cooldown")));
pub static DYE_COLOR: Lazy<Key<DyeColor>> =
    Lazy::new(|| Key::plain(KeyId::from_static("demo:dye_color")));
pub static BANNER_PATTERNS: Lazy<Key<Vec<Pattern>>> =
    Lazy::new(|| Key::list(KeyId::from_static("demo:banner_patterns")));
pub static LOCK_TOKEN: Lazy<Key<String>> =
    Lazy::new(|| Key::plain(KeyId::from_static("demo:lock_token")));

/// Cooldown a hopper reports when it has never ticked.
pub const DEFAULT_COOLDOWN: i32 = 8;

// ============================================================================
// Hosts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DyeColor {
    White,
    Red,
    Blue,
    Black,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern {
    pub shape: String,
    pub color: DyeColor,
}

impl Pattern {
    pub fn new(shape: &str, color: DyeColor) -> Self {
        Pattern {
            shape: shape.to_string(),
            color,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sign {
    pub lines: Option<Vec<String>>,
    pub glowing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hopper {
    pub cooldown: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    pub base: Option<DyeColor>,
    pub patterns: Option<Vec<Pattern>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Banner,
    Shield,
    Wool,
    Stone,
}

/// Item stack; the banner provider writes `banner_base`, the generic
/// dyeable provider writes `color`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: u32,
    pub color: Option<DyeColor>,
    pub banner_base: Option<DyeColor>,
}

impl ItemStack {
    pub fn new(kind: ItemKind) -> Self {
        ItemStack {
            kind,
            count: 1,
            color: None,
            banner_base: None,
        }
    }
}

/// Lockable container whose lock write touches two fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chest {
    pub lock: Option<String>,
    pub locked: bool,
    pub storage_broken: bool,
}

// ============================================================================
// Registry
// ============================================================================

/// Register every fixture provider into `builder`.
pub fn register_all(builder: &mut RegistryBuilder) {
    {
        let mut signs = builder.register::<Sign>();
        signs
            .create(&SIGN_LINES)
            .get(|sign| sign.lines.clone())
            .set(|sign, lines| {
                if lines.len() > 4 {
                    return false;
                }
                sign.lines = Some(lines);
                true
            })
            .delete(|sign| sign.lines.take().is_some())
            .build();
        signs
            .create(&GLOWING)
            .get(|sign| Some(sign.glowing))
            .set(|sign, glowing| {
                sign.glowing = glowing;
                true
            })
            .reset_on_delete(false)
            .build();
    }

    builder
        .register::<Hopper>()
        .create(&COOLDOWN)
        .get(|hopper| hopper.cooldown)
        .set(|hopper, cooldown| {
            hopper.cooldown = Some(cooldown);
            true
        })
        .delete(|hopper| hopper.cooldown.take().is_some())
        .bounds(1, i32::MAX)
        .default_value(DEFAULT_COOLDOWN)
        .build();

    {
        let mut banners = builder.register::<Banner>();
        banners
            .create(&DYE_COLOR)
            .get(|banner| banner.base)
            .set(|banner, color| {
                banner.base = Some(color);
                true
            })
            .default_value(DyeColor::White)
            .build();
        banners
            .create(&BANNER_PATTERNS)
            .get(|banner| banner.patterns.clone())
            .set(|banner, patterns| {
                banner.patterns = Some(patterns);
                true
            })
            .delete(|banner| banner.patterns.take().is_some())
            .build();
    }

    {
        // Narrower provider first: banner items keep their color elsewhere
        let mut items = builder.register::<ItemStack>();
        items
            .create(&DYE_COLOR)
            .get(|stack| stack.banner_base)
            .set(|stack, color| {
                stack.banner_base = Some(color);
                true
            })
            .supports(|stack| stack.kind == ItemKind::Banner)
            .build();
        items
            .create(&DYE_COLOR)
            .get(|stack| stack.color)
            .set(|stack, color| {
                if stack.count == 0 {
                    return false;
                }
                stack.color = Some(color);
                true
            })
            .delete(|stack| stack.color.take().is_some())
            .supports(|stack| stack.kind != ItemKind::Stone)
            .build();
    }

    builder
        .register::<Chest>()
        .create(&LOCK_TOKEN)
        .get(|chest| chest.lock.clone())
        .try_set(|chest, token| {
            chest.locked = true;
            if chest.storage_broken {
                return Err(ProviderError::PartialWrite(
                    "lock flag written, token lost".to_string(),
                ));
            }
            chest.lock = Some(token);
            Ok(true)
        })
        .try_delete(|chest| {
            chest.locked = false;
            Ok(chest.lock.take().is_some())
        })
        .build();
}

/// Frozen registry with every fixture provider.
pub fn registry() -> ProviderRegistry {
    let mut builder = ProviderRegistry::builder();
    register_all(&mut builder);
    builder.build().expect("fixture registry")
}

/// Engine over the fixture registry with its own cache.
pub fn engine() -> DataEngine {
    init_tracing();
    DataEngine::with_config(registry(), DataConfig::default())
}

/// Engine with custom settings.
pub fn engine_with(config: DataConfig) -> DataEngine {
    init_tracing();
    DataEngine::with_config(registry(), config)
}

pub fn sign(lines: &[&str]) -> Sign {
    Sign {
        lines: Some(lines.iter().map(|line| line.to_string()).collect()),
        glowing: false,
    }
}

pub fn hopper(cooldown: i32) -> Hopper {
    Hopper {
        cooldown: Some(cooldown),
    }
}

pub fn red_banner() -> Banner {
    Banner {
        base: Some(DyeColor::Red),
        patterns: Some(Vec::new()),
    }
}
