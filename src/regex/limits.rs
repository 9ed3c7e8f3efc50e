//! Named resource caps (spec §6, "Numeric limits"). Every configurable
//! knob is a constant here rather than a mutable global; callers needing
//! different limits build their own `VmLimits` explicitly (spec §9).

pub const MAX_GROUPS: usize = 100;
pub const MAX_THREAD: usize = 200;
pub const MAX_CALL_DEPTH: usize = 100;
pub const MEM_CAP: usize = 100_000_000;

#[derive(Copy, Clone, Debug)]
pub struct VmLimits {
    pub max_thread: usize,
    pub max_call_depth: usize,
    pub mem_cap: usize,
}

impl Default for VmLimits {
    fn default() -> VmLimits {
        VmLimits {
            max_thread: MAX_THREAD,
            max_call_depth: MAX_CALL_DEPTH,
            mem_cap: MEM_CAP,
        }
    }
}
