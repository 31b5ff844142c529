//! Per-request dispatch state.
//!
//! # Responsibilities
//! - Carry the resolved verb, controller and method through the pipeline
//! - Let handlers inspect and override routing before the method runs
//! - Record whether a stage stopped the pipeline
//!
//! # Design Decisions
//! - Stages signal an abort by returning [`Flow::Stop`]; the pipeline records it here
//! - The stop flag is one-way: nothing clears it once set

/// Result of a pipeline stage (handler, `init` or `before` hook).
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Run the next stage.
    Continue,
    /// Skip every remaining stage for this request.
    Stop,
}

impl Flow {
    pub fn is_stop(self) -> bool {
        self == Flow::Stop
    }
}

/// Request argument threaded through one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReqArg {
    req_method: String,
    control_name: String,
    control_method: String,
    path_params: String,
    stopped: bool,
}

impl ReqArg {
    pub(crate) fn new(
        req_method: impl Into<String>,
        control_name: impl Into<String>,
        control_method: impl Into<String>,
        path_params: impl Into<String>,
    ) -> Self {
        Self {
            req_method: req_method.into(),
            control_name: control_name.into(),
            control_method: control_method.into(),
            path_params: path_params.into(),
            stopped: false,
        }
    }

    /// Normalized HTTP verb (`Get`, `Post`, ...).
    pub fn req_method(&self) -> &str {
        &self.req_method
    }

    /// Type name of the addressed controller.
    pub fn control_name(&self) -> &str {
        &self.control_name
    }

    /// Name of the method that will be invoked.
    pub fn control_method(&self) -> &str {
        &self.control_method
    }

    /// Residual path parameters after the method segment.
    pub fn path_params(&self) -> &str {
        &self.path_params
    }

    /// Override the method to invoke. Takes effect at dispatch time.
    pub fn set_control_method(&mut self, method: impl Into<String>) {
        self.control_method = method.into();
    }

    pub fn set_path_params(&mut self, params: impl Into<String>) {
        self.path_params = params.into();
    }

    /// True once any stage has returned [`Flow::Stop`].
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Fold a stage result into the stop flag and return the effective flow.
    pub(crate) fn record(&mut self, flow: Flow) -> Flow {
        if flow.is_stop() {
            self.stopped = true;
        }
        if self.stopped {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_one_way() {
        let mut arg = ReqArg::new("Get", "UserController", "Get", "5");
        assert!(!arg.is_stopped());

        assert_eq!(arg.record(Flow::Continue), Flow::Continue);
        assert!(!arg.is_stopped());

        assert_eq!(arg.record(Flow::Stop), Flow::Stop);
        assert!(arg.is_stopped());

        // A later Continue does not clear it
        assert_eq!(arg.record(Flow::Continue), Flow::Stop);
        assert!(arg.is_stopped());
    }

    #[test]
    fn test_setters() {
        let mut arg = ReqArg::new("Post", "UserController", "user", "");
        arg.set_control_method("PostUser");
        arg.set_path_params("a/b");
        assert_eq!(arg.control_method(), "PostUser");
        assert_eq!(arg.path_params(), "a/b");
        assert_eq!(arg.req_method(), "Post");
        assert_eq!(arg.control_name(), "UserController");
    }
}
