// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A render pipeline: an ordered list of steps, each rendering into one target.

use crate::renderer::api::command::RenderCommand;
use crate::renderer::api::context::RenderContext;
use crate::renderer::api::resource::RenderTarget;
use crate::renderer::backend::RenderBackend;
use std::sync::Arc;

/// Records the commands of one pipeline step into its context.
pub type StepExecutor = Box<dyn Fn(&RenderBackend, &RenderTarget, &RenderContext) + Send + Sync>;

/// One stage of a pipeline.
pub struct PipelineStep {
    target: RenderTarget,
    context: RenderContext,
    executor: StepExecutor,
}

impl PipelineStep {
    /// A step rendering into `target` through a context of `capacity` commands.
    pub fn new<F>(target: RenderTarget, capacity: usize, executor: F) -> Self
    where
        F: Fn(&RenderBackend, &RenderTarget, &RenderContext) + Send + Sync + 'static,
    {
        let mut context = RenderContext::new(capacity);
        context.set_target(Some(target.clone()));
        Self {
            target,
            context,
            executor: Box::new(executor),
        }
    }

    /// A step copying `source` into `destination`.
    ///
    /// The step queues a single blit command; `capacity` leaves room for
    /// commands other steps' executors may add to the same context.
    pub fn blit(source: RenderTarget, destination: RenderTarget, capacity: usize) -> Self {
        let handle = source.backend_data[0];
        let (width, height) = (source.width, source.height);
        Self::new(destination, capacity.max(1), move |_, _, context| {
            context.queue(
                0,
                RenderCommand::Blit {
                    source: handle,
                    width,
                    height,
                },
            );
        })
    }

    /// The target this step renders into.
    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    /// The step's command buffer.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }
}

impl std::fmt::Debug for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineStep")
            .field("target", &self.target)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Sequences steps against one backend.
#[derive(Debug)]
pub struct RenderPipeline {
    backend: Arc<RenderBackend>,
    steps: Vec<PipelineStep>,
}

impl RenderPipeline {
    /// An empty pipeline bound to `backend`.
    pub fn new(backend: Arc<RenderBackend>) -> Self {
        Self {
            backend,
            steps: Vec::new(),
        }
    }

    /// The backend steps are dispatched to.
    pub fn backend(&self) -> &Arc<RenderBackend> {
        &self.backend
    }

    /// Appends a step. Steps run and dispatch in insertion order.
    pub fn add_step(&mut self, step: PipelineStep) {
        self.steps.push(step);
    }

    /// The steps in order.
    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    /// Runs every step's executor so the contexts fill up.
    pub fn execute(&self) {
        for step in &self.steps {
            (step.executor)(&self.backend, &step.target, &step.context);
        }
    }

    /// Hands every step's context to the backend, in step order.
    pub fn dispatch(&mut self) {
        for step in &mut self.steps {
            self.backend.dispatch(&step.target, &mut [&mut step.context]);
        }
    }
}
