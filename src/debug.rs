/*!

  Trace macros, active only with the `DEBUG` feature. The parser uses them to log enter/leave of
  its recursive productions.

*/

#[cfg(feature = "DEBUG")]
#[macro_export]
macro_rules! debug_log {
  ($($args:tt)*) => {
    print!($($args)*)
  }
}

#[cfg(not(feature = "DEBUG"))]
#[macro_export]
macro_rules! debug_log {
  ($($args:tt)*) => {};
}

#[cfg(feature = "DEBUG")]
#[macro_export]
macro_rules! debug_logln {
  ($($args:tt)*) => {
    println!($($args)*)
  }
}

#[cfg(not(feature = "DEBUG"))]
#[macro_export]
macro_rules! debug_logln {
  ($($args:tt)*) => {};
}
