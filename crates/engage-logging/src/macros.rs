//! ---
//! engage_section: "05-logging"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Context-enriched logging macros."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---

#[doc(hidden)]
#[macro_export]
macro_rules! eg_event {
    ($level:expr, context = $ctx:expr, fields($($field:tt)+), $($arg:tt)+) => {{
        let ctx: &$crate::LogContext<'_> = &$ctx;
        $crate::tracing::event!(
            $level,
            $($field)+,
            descriptor = ctx.descriptor.unwrap_or(""),
            group = ctx.group.unwrap_or(""),
            field = ctx.field.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($level:expr, context = $ctx:expr, $($arg:tt)+) => {{
        let ctx: &$crate::LogContext<'_> = &$ctx;
        $crate::tracing::event!(
            $level,
            descriptor = ctx.descriptor.unwrap_or(""),
            group = ctx.group.unwrap_or(""),
            field = ctx.field.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::eg_event!($level, context = $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an informational log enriched with descriptor context.
#[macro_export]
macro_rules! eg_info {
    ($($arg:tt)+) => {
        $crate::eg_event!($crate::tracing::Level::INFO, $($arg)+)
    };
}

/// Emit a debug log enriched with descriptor context.
#[macro_export]
macro_rules! eg_debug {
    ($($arg:tt)+) => {
        $crate::eg_event!($crate::tracing::Level::DEBUG, $($arg)+)
    };
}

/// Emit a warning enriched with descriptor context.
#[macro_export]
macro_rules! eg_warn {
    ($($arg:tt)+) => {
        $crate::eg_event!($crate::tracing::Level::WARN, $($arg)+)
    };
}

/// Emit an error log enriched with descriptor context.
#[macro_export]
macro_rules! eg_error {
    ($($arg:tt)+) => {
        $crate::eg_event!($crate::tracing::Level::ERROR, $($arg)+)
    };
}
