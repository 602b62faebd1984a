//! Form submission flow and client-side validation

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        user::{LoginRequest, RegisterRequest},
        Role,
    },
};

/// Digits kept from the NIS (student number) input
pub const NIS_LENGTH: usize = 7;

pub const PASSWORD_MISMATCH_MESSAGE: &str = "Password dan konfirmasi password tidak cocok";

/// Lifecycle of a single form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Success(String),
    Failure(String),
}

/// Drives one form through `Idle -> Submitting -> Success | Failure`.
///
/// At most one request is in flight per flow: the loading flag is taken
/// with a compare-exchange before anything is awaited, and a second submit
/// while it is held fails with [`AppError::Busy`] without calling the
/// request closure.
pub struct FormFlow {
    name: &'static str,
    loading: AtomicBool,
    state: Mutex<FormState>,
    cancel: CancellationToken,
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FormFlow {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            loading: AtomicBool::new(false),
            state: Mutex::new(FormState::Idle),
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether the submit control should be disabled
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Abort any in-flight request; later submits fail with `Cancelled`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Validate, then issue `request` once.
    ///
    /// `on_success` produces the confirmation message stored in
    /// [`FormState::Success`].
    pub async fn submit<T, V, F, Fut, S>(&self, validate: V, request: F, on_success: S) -> AppResult<T>
    where
        V: FnOnce() -> AppResult<()>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
        S: FnOnce(&T) -> String,
    {
        if self.cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("{} form: submit ignored, request already in flight", self.name);
            return Err(AppError::Busy);
        }
        let _guard = LoadingGuard(&self.loading);

        if let Err(e) = validate() {
            tracing::debug!("{} form: validation failed: {}", self.name, e);
            self.set_state(FormState::Failure(e.user_message()));
            return Err(e);
        }

        self.set_state(FormState::Submitting);

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::Cancelled),
            result = request() => result,
        };

        match &result {
            Ok(value) => self.set_state(FormState::Success(on_success(value))),
            Err(AppError::Cancelled) => {
                tracing::debug!("{} form: request cancelled", self.name);
                self.set_state(FormState::Idle);
            }
            Err(e) => self.set_state(FormState::Failure(e.user_message())),
        }

        result
    }

    fn set_state(&self, state: FormState) {
        *self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }
}

/// Keep only digits and truncate to [`NIS_LENGTH`]
pub fn sanitize_nis(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(NIS_LENGTH)
        .collect()
}

/// Login form
#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(
        length(min = 1, message = "Email wajib diisi"),
        email(message = "Format email tidak valid")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        Ok(())
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Member registration form
#[derive(Debug, Clone, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Nama wajib diisi"))]
    pub name: String,
    #[validate(email(message = "Format email tidak valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "NIS wajib diisi"))]
    pub nis: String,
    #[validate(length(min = 1, message = "Jurusan wajib diisi"))]
    pub major: String,
    #[validate(length(min = 1, message = "Kelas wajib diisi"))]
    pub grade: String,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            nis: String::new(),
            major: String::new(),
            grade: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            role: Role::Member,
        }
    }
}

impl RegisterForm {
    /// NIS input handler; strips non-digits and truncates
    pub fn set_nis(&mut self, input: &str) {
        self.nis = sanitize_nis(input);
    }

    /// Password confirmation first, then field rules
    pub fn check(&self) -> AppResult<()> {
        if self.password != self.confirm_password {
            return Err(AppError::Validation(PASSWORD_MISMATCH_MESSAGE.to_string()));
        }

        let mut trimmed = self.clone();
        trimmed.name = self.name.trim().to_string();
        trimmed.email = self.email.trim().to_string();
        trimmed.major = self.major.trim().to_string();
        trimmed.grade = self.grade.trim().to_string();
        trimmed.nis = sanitize_nis(&self.nis);
        trimmed.validate()?;
        Ok(())
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            nis: sanitize_nis(&self.nis),
            major: self.major.trim().to_string(),
            grade: self.grade.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::time::Duration;

    fn register_form() -> RegisterForm {
        let mut form = RegisterForm {
            name: "Dewi".to_string(),
            email: "dewi@sekolah.id".to_string(),
            major: "TKJ".to_string(),
            grade: "XI".to_string(),
            password: "rahasia".to_string(),
            confirm_password: "rahasia".to_string(),
            ..Default::default()
        };
        form.set_nis("2201234");
        form
    }

    #[test]
    fn test_sanitize_nis() {
        assert_eq!(sanitize_nis("12a3456789"), "1234567");
        assert_eq!(sanitize_nis("abc"), "");
        assert_eq!(sanitize_nis(" 12-34 "), "1234");
    }

    #[test]
    fn test_register_form_valid() {
        assert!(register_form().check().is_ok());
        assert_eq!(register_form().to_request().role, Role::Member);
    }

    #[test]
    fn test_register_password_mismatch() {
        let form = RegisterForm {
            confirm_password: "berbeda".to_string(),
            ..register_form()
        };
        let err = form.check().unwrap_err();
        assert_eq!(err.user_message(), PASSWORD_MISMATCH_MESSAGE);
    }

    #[test]
    fn test_register_password_too_short() {
        let form = RegisterForm {
            password: "abc".to_string(),
            confirm_password: "abc".to_string(),
            ..register_form()
        };
        assert_eq!(form.check().unwrap_err().user_message(), "Password minimal 6 karakter");
    }

    #[test]
    fn test_register_missing_name() {
        let form = RegisterForm {
            name: "  ".to_string(),
            ..register_form()
        };
        assert!(form.check().unwrap_err().user_message().contains("Nama wajib diisi"));
    }

    #[test]
    fn test_register_email_is_trimmed() {
        let form = RegisterForm {
            email: " dewi@sekolah.id ".to_string(),
            ..register_form()
        };
        assert!(form.check().is_ok());
        assert_eq!(form.to_request().email, "dewi@sekolah.id");
    }

    #[test]
    fn test_login_form() {
        assert!(LoginForm::new("  a@b.id ", "x").check().is_ok());
        assert!(LoginForm::new("bukan-email", "x").check().is_err());
        assert!(LoginForm::new("a@b.id", "").check().is_err());
    }

    #[tokio::test]
    async fn test_validation_failure_skips_request() {
        let flow = FormFlow::new("register");
        let calls = AtomicUsize::new(0);

        let result = flow
            .submit(
                || Err(AppError::Validation(PASSWORD_MISMATCH_MESSAGE.to_string())),
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
                |_| String::new(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(flow.state(), FormState::Failure(PASSWORD_MISMATCH_MESSAGE.to_string()));
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn test_success_and_failure_states() {
        let flow = FormFlow::new("login");

        let value = flow
            .submit(|| Ok(()), || async { Ok(5) }, |v| format!("ok {}", v))
            .await
            .unwrap();
        assert_eq!(value, 5);
        assert_eq!(flow.state(), FormState::Success("ok 5".to_string()));

        let result: AppResult<()> = flow
            .submit(
                || Ok(()),
                || async {
                    Err(AppError::Server {
                        status: 401,
                        message: "Email atau password salah".to_string(),
                    })
                },
                |_| String::new(),
            )
            .await;
        assert!(result.is_err());
        assert_eq!(
            flow.state(),
            FormState::Failure("Email atau password salah".to_string())
        );
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn test_double_submit_issues_one_request() {
        let flow = Arc::new(FormFlow::new("login"));
        let calls = Arc::new(AtomicUsize::new(0));

        let request = |calls: Arc<AtomicUsize>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok::<(), AppError>(())
            }
        };

        let (first, second) = tokio::join!(
            flow.submit(|| Ok(()), request(calls.clone()), |_| "ok".to_string()),
            flow.submit(|| Ok(()), request(calls.clone()), |_| "ok".to_string()),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(AppError::Busy)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn test_cancel_in_flight_request() {
        let flow = Arc::new(FormFlow::new("book"));

        let pending = {
            let flow = flow.clone();
            tokio::spawn(async move {
                flow.submit(
                    || Ok(()),
                    || async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok(())
                    },
                    |_| String::new(),
                )
                .await
            })
        };

        while !flow.is_loading() {
            tokio::task::yield_now().await;
        }
        flow.cancel();

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(flow.state(), FormState::Idle);
        assert!(!flow.is_loading());

        let again = flow
            .submit(|| Ok(()), || async { Ok(()) }, |_| String::new())
            .await;
        assert!(matches!(again, Err(AppError::Cancelled)));
    }
}
