//! 핸들러 호출 시 전달되는 디스패치 컨텍스트.

use std::sync::Arc;

use crate::domain::flag::FlagValue;
use crate::domain::parse::Activation;

/// 플래그/명령 핸들러 함수 타입.
pub type HandlerFn = Arc<dyn Fn(&mut DispatchContext) -> anyhow::Result<()> + Send + Sync>;

/// 현재 처리 중인 명령/플래그 정보.
/// 디스패치 한 번마다 새로 만들어 핸들러에 명시적으로 넘긴다.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// 현재 명령 이름(시작 단계에서는 터미널 의사 명령 이름)
    pub command_name: String,
    /// 현재 실행 중인 플래그의 long 이름. 명령 핸들러 실행 중에는 `None`.
    pub flag_name: Option<String>,
    /// 현재 플래그의 변환된 입력값
    pub flag_input: Option<FlagValue>,
    /// 플래그에 매칭되지 않은 위치 인자
    pub args: Vec<String>,
    /// 이번 줄에서 활성화된 플래그 전체(활성화 순서)
    pub activations: Vec<Activation>,
}

impl DispatchContext {
    pub fn new(command_name: &str, args: Vec<String>, activations: Vec<Activation>) -> Self {
        Self {
            command_name: command_name.to_string(),
            flag_name: None,
            flag_input: None,
            args,
            activations,
        }
    }

    pub fn has_flag(&self, long_name: &str) -> bool {
        self.activations.iter().any(|a| a.long_name() == long_name)
    }

    /// 활성화된 플래그의 입력값을 long 이름으로 조회한다.
    pub fn flag_value(&self, long_name: &str) -> Option<&FlagValue> {
        self.activations
            .iter()
            .find(|a| a.long_name() == long_name)
            .and_then(|a| a.value.as_ref())
    }

    pub(crate) fn enter_flag(&mut self, activation: &Activation) {
        self.flag_name = Some(activation.long_name().to_string());
        self.flag_input = activation.value.clone();
    }

    pub(crate) fn leave_flag(&mut self) {
        self.flag_name = None;
        self.flag_input = None;
    }
}
