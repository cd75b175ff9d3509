/**
 * ports module
 * Candidate generation, bind probing and the resolution state machine
 */

pub mod probe;
pub mod range;
pub mod resolver;
pub mod unsafe_list;

pub use probe::{check_port, try_port, Hosts};
pub use range::generate_range;
pub use resolver::{
    get_port, get_port_memoized, get_port_with_env, get_random_port, merge_options, wait_for_port,
    EnvDefaults, PortOptions, ResolvedOptions, WaitOptions, DEFAULT_ALTERNATIVE_RANGE, DEFAULT_PORT,
};
pub use unsafe_list::{is_safe_port, is_unsafe_port};
