#[macro_export]
macro_rules! error_exit {
    ($($arg:tt)+) => ({
        ::log::error!($($arg)+);
        ::std::process::exit(1)
    });
}

// https://github.com/rust-lang/rust/issues/130113
pub fn send_fut_lifetime_workaround<F: Future + Send>(
    fut: F,
) -> impl Future<Output=F::Output> + Send {
    fut
}
