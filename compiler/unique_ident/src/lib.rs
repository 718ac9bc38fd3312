/// Hands out `temp<N>` names, starting at `temp1`.
///
/// Each code generator owns its own counter, so names are unique within one
/// generation pass and independent passes never share state.
#[derive(Debug, Default, Clone)]
pub struct TempCounter {
    count: u32,
}

impl TempCounter {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn make_temp(&mut self) -> String {
        self.count += 1;
        format!("temp{}", self.count)
    }

    /// Number of temporaries handed out so far
    pub fn issued(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
