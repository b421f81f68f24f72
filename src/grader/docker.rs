//! Docker-backed grader
//!
//! Every grading run gets a fresh container: the source is written into
//! `/workspace`, compiled once, then executed against each input under
//! coreutils `timeout`. The container is removed whatever happens.
//!
//! Every Docker call is bounded: compilation by the configured compile
//! timeout, each case by its time limit, bookkeeping by a fixed limit. The
//! caller may be holding a problem lock while it waits.

use std::{collections::HashMap, future::Future, time::Duration};

use async_trait::async_trait;
use base64::Engine;
use bollard::{
    container::LogOutput,
    exec::{CreateExecOptions, StartExecResults},
    models::{ContainerCreateBody, HostConfig},
    query_parameters::{
        CreateContainerOptionsBuilder, RemoveContainerOptionsBuilder, StartContainerOptions,
    },
    Docker,
};
use futures::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::GraderConfig,
    constants::{CONTAINER_OP_TIMEOUT_MS, TIMEOUT_EXIT_CODE},
    error::{AppError, AppResult},
    gateways::{CodeGrader, GradedCase, GradingReport, GradingRequest},
    models::RuntimeStatus,
};

use super::languages::Toolchain;

/// Raw output of one `exec` inside the container
#[derive(Debug, Default)]
struct ExecOutput {
    stdout: String,
    stderr: String,
    exit_code: i64,
}

/// Runs reference solutions in throwaway Docker containers
#[derive(Clone)]
pub struct DockerGrader {
    docker: Docker,
    config: GraderConfig,
}

impl DockerGrader {
    pub fn new(docker: Docker, config: GraderConfig) -> Self {
        Self { docker, config }
    }

    async fn create_container(
        &self,
        run_id: &Uuid,
        toolchain: &Toolchain,
        memory_limit_mb: u64,
    ) -> AppResult<String> {
        let options = CreateContainerOptionsBuilder::default()
            .name(&format!("grader-{run_id}"))
            .build();

        let memory_bytes = (memory_limit_mb * 1024 * 1024) as i64;
        let host_config = HostConfig {
            memory: Some(memory_bytes),
            memory_swap: Some(memory_bytes),
            cpu_period: Some(100_000),
            cpu_quota: Some((self.config.cpu_limit * 100_000.0) as i64),
            network_mode: Some(self.config.network_name.clone()),
            pids_limit: Some(64),
            ..Default::default()
        };

        let body = ContainerCreateBody {
            image: Some(toolchain.image.to_string()),
            tty: Some(true),
            open_stdin: Some(true),
            host_config: Some(host_config),
            working_dir: Some("/workspace".to_string()),
            env: Some(vec!["LANG=C.UTF-8".to_string()]),
            labels: Some(HashMap::from([(
                "grader.run".to_string(),
                run_id.to_string(),
            )])),
            ..Default::default()
        };

        let container = bounded(
            "create container",
            self.docker.create_container(Some(options), body),
        )
        .await??;
        bounded(
            "start container",
            self.docker
                .start_container(&container.id, None::<StartContainerOptions>),
        )
        .await??;

        Ok(container.id)
    }

    async fn remove_container(&self, container_id: &str) -> AppResult<()> {
        let options = RemoveContainerOptionsBuilder::default().force(true).build();
        bounded(
            "remove container",
            self.docker.remove_container(container_id, Some(options)),
        )
        .await??;
        Ok(())
    }

    /// Write the source and build it. Returns the compiler diagnostic on
    /// failure, including when the build outlives the compile timeout.
    async fn compile(
        &self,
        container_id: &str,
        toolchain: &Toolchain,
        source_code: &str,
    ) -> AppResult<Option<String>> {
        self.write_file(container_id, &toolchain.source_path(), source_code)
            .await?;

        let Some(compile_cmd) = toolchain.compile_command else {
            return Ok(None);
        };

        let limit_ms = self.config.compile_timeout_ms;
        let cmd = format!("timeout {:.3}s {compile_cmd}", limit_ms as f64 / 1000.0);
        let budget = Duration::from_millis(limit_ms + self.config.timeout_slack_ms);

        match tokio::time::timeout(budget, self.exec_command(container_id, &cmd)).await {
            Ok(output) => Ok(compile_diagnostic(&output?, limit_ms)),
            Err(_) => {
                debug!(container_id, "Host-side timeout while compiling");
                Ok(Some(compile_timeout_message(limit_ms)))
            }
        }
    }

    async fn run_case(
        &self,
        container_id: &str,
        toolchain: &Toolchain,
        input: &str,
        time_limit_ms: i32,
    ) -> AppResult<GradedCase> {
        self.write_file(container_id, "/workspace/input.txt", input)
            .await?;

        let cmd = format!(
            "timeout {:.3}s {} < /workspace/input.txt",
            f64::from(time_limit_ms) / 1000.0,
            toolchain.run_command
        );
        let budget = Duration::from_millis(
            u64::try_from(time_limit_ms).unwrap_or(0) + self.config.timeout_slack_ms,
        );

        let graded = match tokio::time::timeout(budget, self.exec_command(container_id, &cmd)).await
        {
            Ok(output) => {
                let output = output?;
                let runtime_status = classify_exit(output.exit_code);
                let text = match runtime_status {
                    RuntimeStatus::Error if output.stdout.is_empty() => output.stderr,
                    _ => output.stdout,
                };
                GradedCase {
                    input: input.to_string(),
                    output: text,
                    runtime_status,
                }
            }
            Err(_) => {
                debug!(container_id, "Host-side timeout while running case");
                GradedCase {
                    input: input.to_string(),
                    output: String::new(),
                    runtime_status: RuntimeStatus::Timeout,
                }
            }
        };

        Ok(graded)
    }

    async fn grade_in_container(
        &self,
        container_id: &str,
        toolchain: &Toolchain,
        request: &GradingRequest,
    ) -> AppResult<GradingReport> {
        if let Some(diagnostic) = self
            .compile(container_id, toolchain, &request.source_code)
            .await?
        {
            debug!(language = toolchain.language, "Solution failed to compile");
            return Ok(GradingReport::not_runnable(&request.inputs, &diagnostic));
        }

        let mut results = Vec::with_capacity(request.inputs.len());
        for input in &request.inputs {
            results.push(
                self.run_case(container_id, toolchain, input, request.time_limit_ms)
                    .await?,
            );
        }

        Ok(GradingReport::from_results(results))
    }

    /// Write a file through base64 so arbitrary bytes survive the shell
    async fn write_file(&self, container_id: &str, path: &str, content: &str) -> AppResult<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        let cmd = format!("echo '{encoded}' | base64 -d > {path}");

        let output = bounded("write file", self.exec_command(container_id, &cmd)).await??;
        if output.exit_code != 0 {
            return Err(anyhow::anyhow!("failed to write {path}: {}", output.stderr).into());
        }

        Ok(())
    }

    async fn exec_command(&self, container_id: &str, cmd: &str) -> AppResult<ExecOutput> {
        let exec = self
            .docker
            .create_exec(
                container_id,
                CreateExecOptions {
                    cmd: Some(vec!["/bin/sh", "-c", cmd]),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    ..Default::default()
                },
            )
            .await?;

        let mut output = ExecOutput::default();

        if let StartExecResults::Attached { output: mut stream, .. } =
            self.docker.start_exec(&exec.id, None).await?
        {
            while let Some(msg) = stream.next().await {
                match msg? {
                    LogOutput::StdOut { message } => {
                        output.stdout.push_str(&String::from_utf8_lossy(&message));
                    }
                    LogOutput::StdErr { message } => {
                        output.stderr.push_str(&String::from_utf8_lossy(&message));
                    }
                    _ => {}
                }
            }
        }

        let inspect = self.docker.inspect_exec(&exec.id).await?;
        output.exit_code = inspect.exit_code.unwrap_or(-1);

        Ok(output)
    }
}

#[async_trait]
impl CodeGrader for DockerGrader {
    async fn run(&self, request: GradingRequest) -> AppResult<GradingReport> {
        let toolchain = Toolchain::for_language(&request.language)?;
        let run_id = Uuid::new_v4();

        let container_id = self
            .create_container(&run_id, &toolchain, request.memory_limit_mb)
            .await?;

        let report = self
            .grade_in_container(&container_id, &toolchain, &request)
            .await;

        if let Err(e) = self.remove_container(&container_id).await {
            warn!(%container_id, error = %e, "Failed to remove grading container");
        }

        let report = report?;
        info!(
            %run_id,
            language = toolchain.language,
            cases = report.results.len(),
            runnable = report.runnable,
            "Grading run finished"
        );

        Ok(report)
    }
}

/// Await a bookkeeping call for at most [`CONTAINER_OP_TIMEOUT_MS`]
async fn bounded<F: Future>(what: &str, fut: F) -> AppResult<F::Output> {
    tokio::time::timeout(Duration::from_millis(CONTAINER_OP_TIMEOUT_MS), fut)
        .await
        .map_err(|_| AppError::Internal(anyhow::anyhow!("{what} timed out")))
}

/// Diagnostic for a finished compile step, `None` when it succeeded
fn compile_diagnostic(output: &ExecOutput, limit_ms: u64) -> Option<String> {
    match output.exit_code {
        0 => None,
        code if code == i64::from(TIMEOUT_EXIT_CODE) => Some(compile_timeout_message(limit_ms)),
        _ => Some(format!("{}{}", output.stdout, output.stderr)),
    }
}

fn compile_timeout_message(limit_ms: u64) -> String {
    format!("Compilation exceeded {limit_ms} ms")
}

/// Map an exec exit code to a per-case status
fn classify_exit(exit_code: i64) -> RuntimeStatus {
    match exit_code {
        0 => RuntimeStatus::Ok,
        code if code == i64::from(TIMEOUT_EXIT_CODE) => RuntimeStatus::Timeout,
        _ => RuntimeStatus::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exit() {
        assert_eq!(classify_exit(0), RuntimeStatus::Ok);
        assert_eq!(classify_exit(124), RuntimeStatus::Timeout);
        assert_eq!(classify_exit(1), RuntimeStatus::Error);
        assert_eq!(classify_exit(-1), RuntimeStatus::Error);
    }

    fn exec(exit_code: i64, stdout: &str, stderr: &str) -> ExecOutput {
        ExecOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    #[test]
    fn test_compile_diagnostic() {
        assert_eq!(compile_diagnostic(&exec(0, "", "warning: unused"), 30_000), None);
        assert_eq!(
            compile_diagnostic(&exec(1, "", "error: expected ';'"), 30_000),
            Some("error: expected ';'".to_string())
        );
        assert_eq!(
            compile_diagnostic(&exec(124, "", ""), 30_000),
            Some("Compilation exceeded 30000 ms".to_string())
        );
    }

    #[test]
    fn test_compile_timeout_makes_report_not_runnable() {
        let inputs = vec!["1".to_string(), "2".to_string()];
        let diagnostic = compile_diagnostic(&exec(124, "", ""), 5_000).unwrap();

        let report = GradingReport::not_runnable(&inputs, &diagnostic);

        assert!(!report.runnable);
        assert_eq!(report.results.len(), 2);
        assert!(report
            .results
            .iter()
            .all(|r| r.runtime_status == RuntimeStatus::Error));
    }

    #[tokio::test]
    async fn test_bounded_passes_value_through() {
        let value = bounded("noop", async { 7 }).await.unwrap();
        assert_eq!(value, 7);
    }
}
